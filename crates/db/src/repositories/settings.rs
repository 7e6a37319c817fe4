use clearance_core::domain::settings::SettingKey;
use sqlx::Row;

use super::{ConfigStore, RepositoryError};
use crate::DbPool;

pub struct SqlConfigStore {
    pool: DbPool,
}

impl SqlConfigStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ConfigStore for SqlConfigStore {
    async fn get(&self, key: SettingKey) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query("SELECT option_value FROM clearance_option WHERE option_key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| {
            r.try_get::<String, _>("option_value").map_err(|e| RepositoryError::Decode(e.to_string()))
        })
        .transpose()
    }

    async fn set(&self, key: SettingKey, value: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO clearance_option (option_key, option_value, updated_at)
             VALUES (?, ?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
             ON CONFLICT(option_key) DO UPDATE SET
                 option_value = excluded.option_value,
                 updated_at = excluded.updated_at",
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, key: SettingKey) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM clearance_option WHERE option_key = ?")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use clearance_core::domain::settings::{ClearanceSettings, SettingKey};

    use super::SqlConfigStore;
    use crate::repositories::ConfigStore;
    use crate::{connect_with_settings, migrations};

    async fn setup() -> SqlConfigStore {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        SqlConfigStore::new(pool)
    }

    fn live_settings() -> ClearanceSettings {
        ClearanceSettings {
            enabled: true,
            override_simple: true,
            override_variable: false,
            from_date: NaiveDate::from_ymd_opt(2026, 11, 27),
            to_date: NaiveDate::from_ymd_opt(2026, 11, 30),
        }
    }

    #[tokio::test]
    async fn empty_store_loads_disabled_settings() {
        let store = setup().await;

        let settings = store.load_settings().await.expect("load settings");

        assert_eq!(settings, ClearanceSettings::default());
    }

    #[tokio::test]
    async fn settings_round_trip_through_option_rows() {
        let store = setup().await;

        store.save_settings(&live_settings()).await.expect("save settings");

        assert_eq!(store.get(SettingKey::Enabled).await.expect("get"), Some("1".to_string()));
        assert_eq!(
            store.get(SettingKey::FromDate).await.expect("get"),
            Some("2026-11-27".to_string())
        );
        assert_eq!(store.load_settings().await.expect("load"), live_settings());
    }

    #[tokio::test]
    async fn saving_disabled_settings_resets_dependent_keys() {
        let store = setup().await;
        store.save_settings(&live_settings()).await.expect("save live");

        let saved = store
            .save_settings(&ClearanceSettings { enabled: false, ..live_settings() })
            .await
            .expect("save disabled");

        assert_eq!(saved, ClearanceSettings::default());
        assert_eq!(store.get(SettingKey::OverrideSimple).await.expect("get"), Some("0".to_string()));
        assert_eq!(store.get(SettingKey::FromDate).await.expect("get"), Some(String::new()));
        assert_eq!(store.get(SettingKey::ToDate).await.expect("get"), Some(String::new()));
    }

    #[tokio::test]
    async fn delete_all_removes_every_setting() {
        let store = setup().await;
        store.save_settings(&live_settings()).await.expect("save");

        store.delete_all().await.expect("delete all");

        for key in SettingKey::ALL {
            assert_eq!(store.get(key).await.expect("get"), None, "{key:?} should be gone");
        }
    }

    #[tokio::test]
    async fn unparseable_stored_date_closes_the_window() {
        let store = setup().await;
        store.save_settings(&live_settings()).await.expect("save");
        store.set(SettingKey::ToDate, "end of month").await.expect("set raw");

        let settings = store.load_settings().await.expect("load");

        assert!(settings.enabled);
        assert_eq!(settings.to_date, None);
    }
}
