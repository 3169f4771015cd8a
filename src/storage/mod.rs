//! Key-value storage port.
//!
//! Everything the service persists goes through [`KeyValueStore`]: the
//! attendance log, saved monthly reports and sessions. Values are JSON strings.

use async_trait::async_trait;
use derive_more::Display;
use serde::{Serialize, de::DeserializeOwned};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

/// JSON array of every attendance record appended through the service.
pub const FICHAJES_KEY: &str = "fichajes";
/// JSON array of monthly report snapshots.
pub const SAVED_REPORTS_KEY: &str = "savedReports";

pub fn session_key(token: &str) -> String {
    format!("session:{token}")
}

#[derive(Debug, Display)]
pub enum StorageError {
    #[display(fmt = "storage backend error: {}", _0)]
    Backend(String),

    #[display(fmt = "corrupt value under '{}': {}", key, reason)]
    Corrupt { key: String, reason: String },
}

impl std::error::Error for StorageError {}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key).await? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

pub async fn store_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, raw).await
}

/// Store that rejects every operation; used to exercise degraded paths.
#[cfg(test)]
pub struct FailingStore;

#[cfg(test)]
#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Backend("unavailable".into()))
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
        Err(StorageError::Backend("unavailable".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("unavailable".into()))
    }
}
