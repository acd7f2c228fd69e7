use crate::api::{user_endpoint, ApiClient};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::types::{PaginatedResponse, UserProfile};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub type CacheResult<T> = Result<T, Arc<ApiError>>;

/// Read-through cache of upstream responses keyed by relative endpoint.
///
/// Concurrent lookups of the same endpoint share a single upstream request.
/// Failed requests are not cached.
#[derive(Clone)]
pub struct ResponseCache {
    cache: Cache<String, Value>,
    client: ApiClient,
}

impl ResponseCache {
    pub fn new(config: &AppConfig, client: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_max_capacity)
            .time_to_live(config.cache_ttl())
            .build();

        Self { cache, client }
    }

    pub async fn get(&self, endpoint: &str) -> CacheResult<Value> {
        let client = self.client.clone();
        let owned = endpoint.to_string();

        self.cache
            .try_get_with(endpoint.to_string(), async move {
                let value = client.get_json(&owned).await;
                if let Err(e) = &value {
                    tracing::warn!(endpoint = %owned, "Upstream fetch failed: {}", e);
                }
                value
            })
            .await
    }

    pub async fn get_as<T: DeserializeOwned>(&self, endpoint: &str) -> CacheResult<T> {
        let value = self.get(endpoint).await?;
        serde_json::from_value(value).map_err(|e| Arc::new(ApiError::Json(e)))
    }

    pub async fn search_pull_requests(&self, endpoint: &str) -> CacheResult<PaginatedResponse> {
        self.get_as(endpoint).await
    }

    /// Looks up a user profile; an unknown user yields `None`.
    pub async fn fetch_user(&self, login: &str) -> CacheResult<Option<UserProfile>> {
        match self.get_as(&user_endpoint(login)).await {
            Ok(profile) => Ok(Some(profile)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Drops the cached response for `endpoint` so the next lookup refetches it.
    pub async fn invalidate(&self, endpoint: &str) {
        tracing::debug!(endpoint, "Invalidating cached response");
        self.cache.invalidate(endpoint).await;
    }
}
