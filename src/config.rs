use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Crate-scoped logging when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "rally_client=info";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: Option<u64>,
    pub max_retries: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub stale_secs: u64,
    pub page_size: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    pub rust_log: String,
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl CacheConfig {
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_secs: 60,
            page_size: 10,
        }
    }
}

impl Config {
    /// Configuration pointing at `base_url` with every other value defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Config {
            api: ApiConfig {
                base_url: base_url.into(),
                timeout_secs: None,
                max_retries: 3,
            },
            cache: CacheConfig::default(),
            auth: AuthConfig::default(),
            telemetry: TelemetryConfig {
                rust_log: DEFAULT_LOG_FILTER.to_string(),
            },
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let base_url = env::var("RALLY_API_URL")?;
        let timeout_secs = match env::var("RALLY_TIMEOUT_SECS") {
            Ok(v) => Some(v.parse::<u64>()?),
            Err(_) => None,
        };
        let max_retries: u32 = env::var("RALLY_MAX_RETRIES")
            .unwrap_or_else(|_| "3".to_string())
            .parse()?;
        let stale_secs: u64 = env::var("RALLY_CACHE_STALE_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()?;
        let page_size: u32 = env::var("RALLY_PAGE_SIZE")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?;
        let username = env::var("RALLY_USERNAME").ok();
        let password = env::var("RALLY_PASSWORD").ok();
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        Ok(Config {
            api: ApiConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                timeout_secs,
                max_retries,
            },
            cache: CacheConfig {
                stale_secs,
                page_size,
            },
            auth: AuthConfig { username, password },
            telemetry: TelemetryConfig { rust_log },
        })
    }
}
