use async_trait::async_trait;
use thiserror::Error;

use clearance_core::domain::clearance::{ClearancePrice, CLEARANCE_PRICE_META_KEY};
use clearance_core::domain::settings::{ClearanceSettings, SettingKey};
use clearance_core::errors::ApplicationError;
use clearance_core::pricing::ClearanceSnapshot;

pub mod memory;
pub mod metadata;
pub mod settings;

pub use memory::{InMemoryConfigStore, InMemoryProductMetadataStore};
pub use metadata::SqlProductMetadataStore;
pub use settings::SqlConfigStore;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        ApplicationError::Persistence(error.to_string())
    }
}

/// Scalar option storage for the five clearance settings.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, key: SettingKey) -> Result<Option<String>, RepositoryError>;
    async fn set(&self, key: SettingKey, value: &str) -> Result<(), RepositoryError>;
    async fn delete(&self, key: SettingKey) -> Result<(), RepositoryError>;

    async fn load_settings(&self) -> Result<ClearanceSettings, RepositoryError> {
        let mut raw = Vec::with_capacity(SettingKey::ALL.len());
        for key in SettingKey::ALL {
            raw.push((key, self.get(key).await?));
        }
        Ok(ClearanceSettings::from_raw(|key| {
            raw.iter().find(|(k, _)| *k == key).and_then(|(_, value)| value.clone())
        }))
    }

    /// Persists the normalized settings, so a disabled configuration always
    /// lands with its dependent keys reset.
    async fn save_settings(
        &self,
        settings: &ClearanceSettings,
    ) -> Result<ClearanceSettings, RepositoryError> {
        let normalized = settings.clone().normalized();
        for (key, value) in normalized.to_raw() {
            self.set(key, &value).await?;
        }
        Ok(normalized)
    }

    async fn delete_all(&self) -> Result<(), RepositoryError> {
        for key in SettingKey::ALL {
            self.delete(key).await?;
        }
        Ok(())
    }
}

/// Per-entity metadata for products and variations.
#[async_trait]
pub trait ProductMetadataStore: Send + Sync {
    async fn get(&self, entity_id: &str, meta_key: &str) -> Result<Option<String>, RepositoryError>;
    async fn set(&self, entity_id: &str, meta_key: &str, value: &str)
        -> Result<(), RepositoryError>;
    async fn delete(&self, entity_id: &str, meta_key: &str) -> Result<(), RepositoryError>;
    async fn get_many(
        &self,
        entity_ids: &[String],
        meta_key: &str,
    ) -> Result<Vec<(String, String)>, RepositoryError>;

    async fn clearance_price(
        &self,
        entity_id: &str,
    ) -> Result<Option<ClearancePrice>, RepositoryError> {
        Ok(self.get(entity_id, CLEARANCE_PRICE_META_KEY).await?.map(ClearancePrice::new))
    }

    async fn set_clearance_price(
        &self,
        entity_id: &str,
        price: &ClearancePrice,
    ) -> Result<(), RepositoryError> {
        self.set(entity_id, CLEARANCE_PRICE_META_KEY, price.as_str()).await
    }

    async fn clearance_snapshot(
        &self,
        entity_ids: &[String],
    ) -> Result<ClearanceSnapshot, RepositoryError> {
        let rows = self.get_many(entity_ids, CLEARANCE_PRICE_META_KEY).await?;
        Ok(rows.into_iter().map(|(id, value)| (id, ClearancePrice::new(value))).collect())
    }
}
