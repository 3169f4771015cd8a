use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::remote::RemoteBackend;

/// Prefix of session tokens minted by a local login.
pub const LOCAL_TOKEN_PREFIX: &str = "local-token-";
/// Prefix used by demo sessions issued by older clients.
pub const DEMO_TOKEN_PREFIX: &str = "demo-token-";

const RECOGNIZED_PREFIXES: [&str; 2] = [LOCAL_TOKEN_PREFIX, DEMO_TOKEN_PREFIX];
const RANDOM_LEN: usize = 11;

fn to_base36(mut n: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// `<epoch-millis>-<random base36>`.
pub fn generate() -> String {
    let random = to_base36(Uuid::new_v4().as_u128());
    let random = &random[..random.len().min(RANDOM_LEN)];
    format!("{}-{}", Utc::now().timestamp_millis(), random)
}

/// Shape check only: a recognized prefix, or exactly two hyphen-separated
/// parts whose first part is a number. Says nothing about issuance or expiry.
pub fn validate(token: &str) -> bool {
    if RECOGNIZED_PREFIXES.iter().any(|p| token.starts_with(p)) {
        return true;
    }

    let parts: Vec<&str> = token.split('-').collect();
    parts.len() == 2
        && parts[0]
            .trim()
            .parse::<f64>()
            .map(|n| !n.is_nan())
            .unwrap_or(false)
}

/// Issues the short-lived tokens embedded in the QR code.
pub struct TokenService {
    remote: Option<Arc<dyn RemoteBackend>>,
    qr_base_url: String,
    rotation_secs: u64,
}

impl TokenService {
    pub fn new(
        remote: Option<Arc<dyn RemoteBackend>>,
        qr_base_url: impl Into<String>,
        rotation_secs: u64,
    ) -> Self {
        Self {
            remote,
            qr_base_url: qr_base_url.into(),
            rotation_secs,
        }
    }

    pub fn rotation_secs(&self) -> u64 {
        self.rotation_secs
    }

    /// Remote token when a backend is configured, locally generated otherwise.
    pub async fn qr_token(&self, bearer: Option<&str>) -> String {
        if let Some(remote) = &self.remote {
            match remote.qr_token(bearer).await {
                Ok(token) => return token,
                Err(e) => info!(error = %e, "Using local token generation"),
            }
        }
        let token = generate();
        debug!(%token, "QR token generated");
        token
    }

    pub fn qr_link(&self, token: &str) -> String {
        format!("{}?token={}", self.qr_base_url, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, model::user::Session};
    use async_trait::async_trait;
    use serde_json::json;

    #[test]
    fn generated_tokens_always_validate() {
        for _ in 0..200 {
            let token = generate();
            assert!(validate(&token), "rejected {token}");
        }
    }

    #[test]
    fn generated_token_shape() {
        let token = generate();
        let (millis, random) = token.split_once('-').unwrap();
        assert!(millis.parse::<i64>().unwrap() > 1_600_000_000_000);
        assert!(!random.is_empty() && random.len() <= RANDOM_LEN);
        assert!(random.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn recognized_prefixes_validate() {
        assert!(validate("local-token-1704096000000"));
        assert!(validate("demo-token-anything-at-all"));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert!(!validate("abc-def"));
        assert!(!validate("1704096000000"));
        assert!(!validate("1704096000000-a-b"));
        assert!(!validate("NaN-abc"));
        assert!(!validate("-abc"));
        assert!(!validate(""));
    }

    #[test]
    fn base36_digits() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    struct DownBackend;

    #[async_trait]
    impl RemoteBackend for DownBackend {
        async fn login(&self, _: &str, _: &str) -> Result<Session, AppError> {
            Err(AppError::remote(None, 500, json!([])))
        }

        async fn qr_token(&self, _: Option<&str>) -> Result<String, AppError> {
            Err(AppError::remote(None, 500, json!([])))
        }
    }

    struct FixedBackend;

    #[async_trait]
    impl RemoteBackend for FixedBackend {
        async fn login(&self, _: &str, _: &str) -> Result<Session, AppError> {
            Err(AppError::InvalidCredentials)
        }

        async fn qr_token(&self, _: Option<&str>) -> Result<String, AppError> {
            Ok("42-fromremote".into())
        }
    }

    #[actix_web::test]
    async fn qr_token_prefers_remote_then_falls_back() {
        let remote = TokenService::new(Some(Arc::new(FixedBackend)), "https://x/login", 30);
        assert_eq!(remote.qr_token(None).await, "42-fromremote");

        let down = TokenService::new(Some(Arc::new(DownBackend)), "https://x/login", 30);
        assert!(validate(&down.qr_token(None).await));

        let local = TokenService::new(None, "https://x/login", 30);
        assert!(validate(&local.qr_token(None).await));
    }

    #[test]
    fn qr_link_embeds_token() {
        let svc = TokenService::new(None, "https://fichaje-web.com/login", 30);
        assert_eq!(
            svc.qr_link("1-abc"),
            "https://fichaje-web.com/login?token=1-abc"
        );
        assert_eq!(svc.rotation_secs(), 30);
    }
}
