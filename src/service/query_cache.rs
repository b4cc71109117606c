//! Keyed response cache with prefix invalidation.
//!
//! Keys are ordered segment lists; invalidating `["matches"]` drops every
//! entry whose key starts with that segment. Mutations never write into the
//! cache, they only invalidate, so the next read refetches from the backend.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api_error::ApiError;
use crate::models::{GameId, GroupId, MatchQuery};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        QueryKey(segments.into_iter().map(|s| s.to_string()).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn auth_user() -> Self {
        Self::new(["authUser"])
    }

    pub fn my_groups() -> Self {
        Self::new(["myGroups"])
    }

    /// Prefix of every single-group entry.
    pub fn groups() -> Self {
        Self::new(["group"])
    }

    pub fn group(group_id: GroupId) -> Self {
        Self::new(["group".to_string(), group_id.to_string()])
    }

    /// Prefix of every match list, paginated or pending.
    pub fn matches() -> Self {
        Self::new(["matches"])
    }

    pub fn pending_matches(group_id: GroupId) -> Self {
        Self::new(["matches".to_string(), "pending".to_string(), group_id.to_string()])
    }

    pub fn group_matches(group_id: GroupId, query: &MatchQuery) -> Self {
        let mut segments = vec!["matches".to_string(), "group".to_string(), group_id.to_string()];
        segments.extend(query.to_query_pairs().into_iter().map(|(k, v)| format!("{}={}", k, v)));
        QueryKey(segments)
    }

    pub fn stats() -> Self {
        Self::new(["stats"])
    }

    pub fn game_stats(group_id: GroupId, game_id: GameId) -> Self {
        Self::new(["stats".to_string(), group_id.to_string(), game_id.to_string()])
    }

    pub fn my_game_stats(group_id: GroupId, game_id: GameId) -> Self {
        Self::new([
            "stats".to_string(),
            group_id.to_string(),
            game_id.to_string(),
            "me".to_string(),
        ])
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    fetched_at: Instant,
    stale_after: Duration,
}

impl CacheEntry {
    fn is_fresh(&self) -> bool {
        self.fetched_at.elapsed() < self.stale_after
    }
}

pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, CacheEntry>>,
    stale_after: Duration,
}

impl QueryCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stale_after,
        }
    }

    /// Fresh cached value, if any.
    pub async fn get<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let entries = self.entries.read().await;
        let entry = entries.get(key).filter(|e| e.is_fresh())?;
        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Cached value has an unexpected shape");
                None
            }
        }
    }

    pub async fn put<T>(&self, key: QueryKey, value: &T)
    where
        T: Serialize,
    {
        self.put_with_ttl(key, value, self.stale_after).await
    }

    pub async fn put_with_ttl<T>(&self, key: QueryKey, value: &T, stale_after: Duration)
    where
        T: Serialize,
    {
        match serde_json::to_value(value) {
            Ok(value) => {
                let entry = CacheEntry {
                    value,
                    fetched_at: Instant::now(),
                    stale_after,
                };
                self.entries.write().await.insert(key, entry);
            }
            Err(e) => warn!(key = %key, error = %e, "Value could not be cached"),
        }
    }

    /// Drop every entry under `prefix`. Returns how many were dropped.
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        debug!(prefix = %prefix, removed = removed, "Invalidated queries");
        removed
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Cached value when fresh, otherwise run `fetch` and cache its result.
    /// Failures are never cached.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.fetch_with_ttl(key, self.stale_after, fetch).await
    }

    pub async fn fetch_with_ttl<T, F, Fut>(
        &self,
        key: QueryKey,
        stale_after: Duration,
        fetch: F,
    ) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(value) = self.get(&key).await {
            debug!(key = %key, "Cache hit");
            return Ok(value);
        }

        let value = fetch().await?;
        self.put_with_ttl(key, &value, stale_after).await;
        Ok(value)
    }
}
