use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::AppError,
    model::user::Session,
    remote::RemoteBackend,
    repository::UserDirectory,
    service::token::{self, LOCAL_TOKEN_PREFIX},
    storage::{KeyValueStore, load_json, session_key, store_json},
    utils::session_cache::SessionCache,
};

/// Persisted form of a session under `session:<token>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(flatten)]
    pub session: Session,
    pub issued_at: DateTime<Utc>,
}

pub struct AuthService {
    directory: Arc<UserDirectory>,
    store: Arc<dyn KeyValueStore>,
    sessions: SessionCache,
    remote: Option<Arc<dyn RemoteBackend>>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(
        directory: Arc<UserDirectory>,
        store: Arc<dyn KeyValueStore>,
        sessions: SessionCache,
        remote: Option<Arc<dyn RemoteBackend>>,
        session_ttl_secs: u64,
    ) -> Self {
        Self {
            directory,
            store,
            sessions,
            remote,
            session_ttl: Duration::seconds(session_ttl_secs.min(i32::MAX as u64) as i64),
        }
    }

    /// Checks the local directory first, then the remote backend if one is
    /// configured. Any failure is reported as invalid credentials.
    #[instrument(name = "auth_login", skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AppError> {
        let username = username.trim();
        let password = password.trim();

        if username.is_empty() || password.is_empty() {
            info!("Validation failed: empty username or password");
            return Err(AppError::InvalidCredentials);
        }

        let session = match self.directory.authenticate(username, password) {
            Some(user) => {
                debug!(role = %user.role, "User found in directory");
                Session {
                    user,
                    token: format!("{LOCAL_TOKEN_PREFIX}{}", token::generate()),
                }
            }
            None => match &self.remote {
                Some(remote) => remote.login(username, password).await.map_err(|e| {
                    info!(error = %e, "Remote login failed");
                    AppError::InvalidCredentials
                })?,
                None => {
                    info!("Invalid credentials");
                    return Err(AppError::InvalidCredentials);
                }
            },
        };

        let stored = StoredSession {
            session: session.clone(),
            issued_at: Utc::now(),
        };
        if let Err(e) = store_json(self.store.as_ref(), &session_key(&session.token), &stored).await
        {
            warn!(error = %e, "Could not persist session, keeping it in memory only");
        }
        self.sessions.insert(session.clone()).await;

        info!("Login successful");
        Ok(session)
    }

    /// Drops the session. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) {
        self.sessions.invalidate(token).await;
        if let Err(e) = self.store.remove(&session_key(token)).await {
            warn!(error = %e, "Could not remove persisted session");
        }
    }

    /// Cache first, then storage. Persisted sessions older than the session
    /// TTL are removed and reported as absent.
    pub async fn current_user(&self, token: &str) -> Option<Session> {
        if let Some(session) = self.sessions.get(token).await {
            return Some(session);
        }

        let key = session_key(token);
        match load_json::<StoredSession>(self.store.as_ref(), &key).await {
            Ok(Some(stored)) if Utc::now() - stored.issued_at >= self.session_ttl => {
                debug!("Persisted session expired");
                if let Err(e) = self.store.remove(&key).await {
                    warn!(error = %e, "Could not remove expired session");
                }
                None
            }
            Ok(Some(stored)) => {
                self.sessions.insert(stored.session.clone()).await;
                Some(stored.session)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Could not read persisted session");
                None
            }
        }
    }
}
