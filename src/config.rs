use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub enum StorageBackend {
    Memory,
    MySql,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,
    pub log_dir: String,

    /// JSON file with `users` and `fichajes`; the built-in demo fixture is used when unset
    pub fixture_path: Option<String>,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,

    /// Optional remote backend consulted when a login misses the local directory
    pub remote_api_url: Option<String>,

    // QR token flow
    pub qr_base_url: String,
    /// Where a scanned, valid `?token=` is redirected to
    pub login_url: String,
    pub qr_rotation_secs: u64,

    // Session cache
    pub session_cache_ttl: u64,
    pub session_cache_capacity: u64,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            api_prefix: "/api".to_string(),
            log_dir: "logs".to_string(),
            fixture_path: None,
            storage_backend: StorageBackend::Memory,
            database_url: None,
            remote_api_url: None,
            qr_base_url: "https://fichaje-web.com/login".to_string(),
            login_url: "/login".to_string(),
            qr_rotation_secs: 30,
            session_cache_ttl: 86400, // 24h
            session_cache_capacity: 10_000,
            rate_login_per_min: 60,
            rate_protected_per_min: 1000,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "mysql" => StorageBackend::MySql,
            _ => StorageBackend::Memory,
        };

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            api_prefix: env::var("API_PREFIX").unwrap_or(defaults.api_prefix),
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
            fixture_path: env_opt("FIXTURE_PATH"),
            storage_backend,
            database_url: env_opt("DATABASE_URL"),
            remote_api_url: env_opt("REMOTE_API_URL"),
            qr_base_url: env::var("QR_BASE_URL").unwrap_or(defaults.qr_base_url),
            login_url: env::var("LOGIN_URL").unwrap_or(defaults.login_url),
            qr_rotation_secs: env_or("QR_ROTATION_SECS", defaults.qr_rotation_secs),
            session_cache_ttl: env_or("SESSION_CACHE_TTL", defaults.session_cache_ttl),
            session_cache_capacity: env_or(
                "SESSION_CACHE_CAPACITY",
                defaults.session_cache_capacity,
            ),
            rate_login_per_min: env_or("RATE_LOGIN_PER_MIN", defaults.rate_login_per_min),
            rate_protected_per_min: env_or(
                "RATE_PROTECTED_PER_MIN",
                defaults.rate_protected_per_min,
            ),
        }
    }
}
