use moka::future::Cache;
use std::time::Duration;

use crate::model::user::Session;

/// Read-through cache in front of the persisted sessions.
/// token => session
#[derive(Clone)]
pub struct SessionCache {
    inner: Cache<String, Session>,
}

impl SessionCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(capacity) // tune based on memory
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn insert(&self, session: Session) {
        self.inner.insert(session.token.clone(), session).await;
    }

    pub async fn get(&self, token: &str) -> Option<Session> {
        self.inner.get(token).await
    }

    pub async fn invalidate(&self, token: &str) {
        self.inner.invalidate(token).await;
    }
}
