use std::collections::HashMap;

use tokio::sync::RwLock;

use clearance_core::domain::settings::SettingKey;

use super::{ConfigStore, ProductMetadataStore, RepositoryError};

#[derive(Default)]
pub struct InMemoryConfigStore {
    options: RwLock<HashMap<SettingKey, String>>,
}

#[async_trait::async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get(&self, key: SettingKey) -> Result<Option<String>, RepositoryError> {
        let options = self.options.read().await;
        Ok(options.get(&key).cloned())
    }

    async fn set(&self, key: SettingKey, value: &str) -> Result<(), RepositoryError> {
        let mut options = self.options.write().await;
        options.insert(key, value.to_string());
        Ok(())
    }

    async fn delete(&self, key: SettingKey) -> Result<(), RepositoryError> {
        let mut options = self.options.write().await;
        options.remove(&key);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProductMetadataStore {
    meta: RwLock<HashMap<(String, String), String>>,
}

#[async_trait::async_trait]
impl ProductMetadataStore for InMemoryProductMetadataStore {
    async fn get(&self, entity_id: &str, meta_key: &str) -> Result<Option<String>, RepositoryError> {
        let meta = self.meta.read().await;
        Ok(meta.get(&(entity_id.to_string(), meta_key.to_string())).cloned())
    }

    async fn set(
        &self,
        entity_id: &str,
        meta_key: &str,
        value: &str,
    ) -> Result<(), RepositoryError> {
        let mut meta = self.meta.write().await;
        meta.insert((entity_id.to_string(), meta_key.to_string()), value.to_string());
        Ok(())
    }

    async fn delete(&self, entity_id: &str, meta_key: &str) -> Result<(), RepositoryError> {
        let mut meta = self.meta.write().await;
        meta.remove(&(entity_id.to_string(), meta_key.to_string()));
        Ok(())
    }

    async fn get_many(
        &self,
        entity_ids: &[String],
        meta_key: &str,
    ) -> Result<Vec<(String, String)>, RepositoryError> {
        let meta = self.meta.read().await;
        let mut found: Vec<(String, String)> = entity_ids
            .iter()
            .filter_map(|id| {
                meta.get(&(id.clone(), meta_key.to_string())).map(|value| (id.clone(), value.clone()))
            })
            .collect();
        found.sort();
        found.dedup();
        Ok(found)
    }
}
