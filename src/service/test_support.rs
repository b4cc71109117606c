use std::sync::Arc;

use crate::config::Config;
use crate::service::api_client::{ApiClient, RetryConfig};
use crate::service::query_cache::QueryCache;

/// Nothing listens on port 1, so connections are refused immediately.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1/api";

pub fn unreachable_config() -> Config {
    Config::with_base_url(UNREACHABLE_URL)
}

pub fn unreachable_client() -> ApiClient {
    ApiClient::with_retry_config(&unreachable_config().api, RetryConfig::none()).unwrap()
}

pub fn fresh_cache() -> Arc<QueryCache> {
    Arc::new(QueryCache::new(unreachable_config().cache.stale_after()))
}
