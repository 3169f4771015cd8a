use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStore, StorageError};

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn is_empty(&self) -> bool {
        self.entries.read().map(|e| e.is_empty()).unwrap_or(true)
    }
}

fn poisoned() -> StorageError {
    StorageError::Backend("memory store lock poisoned".into())
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn set_get_remove() {
        let store = MemoryStore::default();
        assert_eq!(store.get("token").await.unwrap(), None);

        store.set("token", "abc".into()).await.unwrap();
        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("abc"));

        store.set("token", "def".into()).await.unwrap();
        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("def"));

        store.remove("token").await.unwrap();
        assert_eq!(store.get("token").await.unwrap(), None);

        // removing twice is fine
        store.remove("token").await.unwrap();
    }
}
