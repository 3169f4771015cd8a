use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::info;

use super::{KeyValueStore, StorageError};

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

/// Durable store backed by a single `kv_store` table.
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = MySqlPool::connect(database_url).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                k VARCHAR(191) NOT NULL PRIMARY KEY,
                v LONGTEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        info!("MySQL key-value store ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl KeyValueStore for MySqlStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = sqlx::query_scalar::<_, String>("SELECT v FROM kv_store WHERE k = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (k, v) VALUES (?, ?)
            ON DUPLICATE KEY UPDATE v = VALUES(v)
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_store WHERE k = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
