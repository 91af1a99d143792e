//! Service configuration.

use chrono::Weekday;

use crate::quota::StoreFailurePolicy;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/mapscout").
    pub data_dir: String,

    /// Identity service base URL.
    pub identity_base_url: String,

    /// Place data source base URL.
    pub places_base_url: String,

    /// Admin API key for privileged endpoints (purge). Disabled when unset.
    pub admin_api_key: Option<String>,

    /// Day the weekly quota window opens on (default: Monday).
    pub week_start: Weekday,

    /// What admission does when the usage count cannot be read.
    pub store_failure_policy: StoreFailurePolicy,

    /// Upper bound on one place search, in seconds.
    pub search_timeout_seconds: u64,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/mapscout".into()),
            identity_base_url: std::env::var("IDENTITY_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9999".into()),
            places_base_url: std::env::var("PLACES_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9998".into()),
            admin_api_key: std::env::var("ADMIN_API_KEY").ok(),
            week_start: std::env::var("WEEK_START_DAY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Weekday::Mon),
            store_failure_policy: std::env::var("STORE_FAILURE_POLICY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            search_timeout_seconds: std::env::var("SEARCH_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(64 * 1024), // 64KB; search bodies are tiny
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/mapscout".into(),
            identity_base_url: "http://localhost:9999".into(),
            places_base_url: "http://localhost:9998".into(),
            admin_api_key: None,
            week_start: Weekday::Mon,
            store_failure_policy: StoreFailurePolicy::default(),
            search_timeout_seconds: 20,
            cors_origins: vec!["*".into()],
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
