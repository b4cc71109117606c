//! HTTP transport for the Rally backend.
//!
//! Thin layer over `reqwest` that owns the base URL, the session cookie jar
//! and the mapping from HTTP failures to [`ApiError`]. Queries retry
//! retryable failures with exponential backoff; mutations never retry.

use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::api_error::{ApiError, ErrorResponse};
use crate::config::ApiConfig;

/// Retry configuration for idempotent reads
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let mut delay = self.initial_delay_ms as f64;
        for _ in 1..attempt {
            delay *= self.backoff_multiplier;
        }
        Duration::from_millis((delay as u64).min(self.max_delay_ms))
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    retry_config: RetryConfig,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let retry_config = RetryConfig {
            max_retries: config.max_retries,
            ..RetryConfig::default()
        };
        Self::with_retry_config(config, retry_config)
    }

    pub fn with_retry_config(config: &ApiConfig, retry_config: RetryConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
            retry_config,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Single GET attempt.
    pub async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let request = self.client.get(self.url(path)).query(query);
        let body = self.execute("GET", path, request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET with retries on server and network failures.
    pub async fn query<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0;

        loop {
            match self.get(path, query).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.retry_config.max_retries => {
                    attempt += 1;
                    let delay = self.retry_config.delay_for(attempt);
                    warn!(
                        path = path,
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Query failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        let text = self.execute("POST", path, request).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// POST whose response body is irrelevant beyond success.
    pub async fn post_empty<B>(&self, path: &str, body: Option<&B>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute("POST", path, request).await.map(|_| ())
    }

    pub async fn patch_empty<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.client.patch(self.url(path)).json(body);
        self.execute("PATCH", path, request).await.map(|_| ())
    }

    async fn execute(
        &self,
        method: &str,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<String, ApiError> {
        debug!(method = method, path = path, "Sending request");

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|body| body.error);
            warn!(
                method = method,
                path = path,
                status = status.as_u16(),
                "Request failed"
            );
            return Err(ApiError::from_status(status.as_u16(), message));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::service::test_support::unreachable_client;

    #[test]
    fn test_url_joining() {
        let config = Config::with_base_url("http://localhost:3000/api/");
        let client = ApiClient::new(&config.api).unwrap();
        assert_eq!(client.url("/matches"), "http://localhost:3000/api/matches");
        assert_eq!(client.url("groups/3"), "http://localhost:3000/api/groups/3");
    }

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_delay_ms, 500);
        assert_eq!(config.backoff_multiplier, 2.0);
    }

    #[test]
    fn test_backoff_is_capped() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for(1), Duration::from_millis(500));
        assert_eq!(config.delay_for(2), Duration::from_millis(1000));
        assert_eq!(config.delay_for(3), Duration::from_millis(2000));
        assert_eq!(config.delay_for(10), Duration::from_millis(5000));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let client = unreachable_client();
        let result: Result<serde_json::Value, ApiError> = client.query("/groups", &[]).await;
        match result {
            Err(e) => {
                assert!(matches!(e, ApiError::NetworkError(_)), "unexpected error: {:?}", e);
                assert!(e.is_retryable());
            }
            Ok(_) => panic!("request to a closed port succeeded"),
        }
    }
}
