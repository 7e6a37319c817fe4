use sqlx::Row;

use super::{ProductMetadataStore, RepositoryError};
use crate::DbPool;

pub struct SqlProductMetadataStore {
    pool: DbPool,
}

impl SqlProductMetadataStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_pair(row: &sqlx::sqlite::SqliteRow) -> Result<(String, String), RepositoryError> {
    let entity_id: String =
        row.try_get("entity_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let meta_value: String =
        row.try_get("meta_value").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    Ok((entity_id, meta_value))
}

#[async_trait::async_trait]
impl ProductMetadataStore for SqlProductMetadataStore {
    async fn get(&self, entity_id: &str, meta_key: &str) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query(
            "SELECT entity_id, meta_value FROM entity_meta WHERE entity_id = ? AND meta_key = ?",
        )
        .bind(entity_id)
        .bind(meta_key)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_pair(r)?.1)),
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        entity_id: &str,
        meta_key: &str,
        value: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO entity_meta (entity_id, meta_key, meta_value, updated_at)
             VALUES (?, ?, ?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
             ON CONFLICT(entity_id, meta_key) DO UPDATE SET
                 meta_value = excluded.meta_value,
                 updated_at = excluded.updated_at",
        )
        .bind(entity_id)
        .bind(meta_key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, entity_id: &str, meta_key: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM entity_meta WHERE entity_id = ? AND meta_key = ?")
            .bind(entity_id)
            .bind(meta_key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_many(
        &self,
        entity_ids: &[String],
        meta_key: &str,
    ) -> Result<Vec<(String, String)>, RepositoryError> {
        if entity_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; entity_ids.len()].join(", ");
        let sql = format!(
            "SELECT entity_id, meta_value FROM entity_meta
             WHERE meta_key = ? AND entity_id IN ({placeholders})
             ORDER BY entity_id"
        );

        let mut query = sqlx::query(&sql).bind(meta_key);
        for entity_id in entity_ids {
            query = query.bind(entity_id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_pair).collect::<Result<Vec<_>, _>>()
    }
}
