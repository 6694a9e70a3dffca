use std::{net::SocketAddr, time::Duration};

use crate::auth::decode_secret_key;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub static_dir: String,
    /// HS256 signing key. A random per-process key is used when absent.
    pub jwt_secret: Option<Vec<u8>>,
    pub token_ttl: Duration,
    pub provider_timeout: Duration,
    pub price_cache_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            db_path: "./db/app.db".to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            static_dir: "static".to_string(),
            jwt_secret: None,
            token_ttl: Duration::from_secs(30 * 60),
            provider_timeout: Duration::from_millis(8_000),
            price_cache_ttl: Duration::from_secs(600),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let listen_addr: SocketAddr = std::env::var("FOLIO_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid FOLIO_LISTEN_ADDR");
        let db_path = std::env::var("FOLIO_DB_PATH").unwrap_or(defaults.db_path);
        let cors_allow = std::env::var("FOLIO_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let static_dir = std::env::var("FOLIO_STATIC_DIR").unwrap_or(defaults.static_dir);
        let jwt_secret = std::env::var("FOLIO_JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|raw| decode_secret_key(&raw).expect("Invalid FOLIO_JWT_SECRET"));

        Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(env_u64("FOLIO_REQUEST_TIMEOUT_MS", 30_000)),
            static_dir,
            jwt_secret,
            token_ttl: Duration::from_secs(60 * env_u64("FOLIO_TOKEN_TTL_MINUTES", 30)),
            provider_timeout: Duration::from_millis(env_u64("FOLIO_PROVIDER_TIMEOUT_MS", 8_000)),
            price_cache_ttl: Duration::from_secs(env_u64("FOLIO_PRICE_CACHE_TTL_SECS", 600)),
        }
    }
}
