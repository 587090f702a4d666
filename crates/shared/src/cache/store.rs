use crate::{abstract_trait::DynCacheBackend, cache::CacheKey, errors::ServiceError};
use chrono::Duration;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct CacheStore {
    backend: DynCacheBackend,
    default_ttl: Duration,
}

impl CacheStore {
    pub fn new(backend: DynCacheBackend, default_ttl: Duration) -> Self {
        Self {
            backend,
            default_ttl,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn to_std(&self, expiration: Duration) -> std::time::Duration {
        expiration
            .to_std()
            .or_else(|_| self.default_ttl.to_std())
            .unwrap_or(std::time::Duration::from_secs(300))
    }

    pub async fn get_from_cache<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        match self.backend.get(key).await {
            Ok(Some(data)) => match serde_json::from_str::<T>(&data) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    error!(
                        "Failed to deserialize cached value for key '{}': {:?}",
                        key, e
                    );
                    None
                }
            },
            Ok(None) => {
                debug!("Cache miss for key: {key}");
                None
            }
            Err(e) => {
                error!("Cache get error for key '{}': {:?}", key, e);
                None
            }
        }
    }

    pub async fn set_to_cache<T>(&self, key: &str, data: &T, expiration: Duration)
    where
        T: Serialize,
    {
        let json_data = match serde_json::to_string(data) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize data for key '{}': {:?}", key, e);
                return;
            }
        };

        match self
            .backend
            .set(key, json_data, self.to_std(expiration))
            .await
        {
            Ok(_) => debug!("Cached key '{}' with TTL {:?}", key, expiration),
            Err(e) => error!("Failed to set cache key '{}': {:?}", key, e),
        }
    }

    pub async fn delete_from_cache(&self, key: &str) {
        if let Err(e) = self.backend.delete(key).await {
            error!("Failed to delete key '{}': {:?}", key, e);
        }
    }

    pub async fn delete_pattern(&self, pattern: &str) -> u64 {
        match self.backend.delete_pattern(pattern).await {
            Ok(removed) => {
                debug!("Deleted {removed} keys matching '{pattern}'");
                removed
            }
            Err(e) => {
                error!("Failed to delete keys matching '{}': {:?}", pattern, e);
                0
            }
        }
    }

    /// Counter with a TTL started on first increment. `None` when the backend
    /// is unreachable.
    pub async fn increment(&self, key: &str, expiration: Duration) -> Option<i64> {
        match self.backend.incr(key, self.to_std(expiration)).await {
            Ok(count) => Some(count),
            Err(e) => {
                error!("Failed to increment key '{}': {:?}", key, e);
                None
            }
        }
    }

    pub async fn clear(&self) -> Result<(), ServiceError> {
        self.backend.clear().await
    }

    pub async fn stats(&self) -> Result<BTreeMap<String, String>, ServiceError> {
        self.backend.stats().await
    }

    /// Drops one product's detail entry (when given) and every product list.
    pub async fn invalidate_products(&self, product_id: Option<i32>) {
        if let Some(id) = product_id {
            self.delete_from_cache(&CacheKey::product_detail(id)).await;
        }

        let mut removed = 0;
        for pattern in CacheKey::PRODUCT_PATTERNS {
            removed += self.delete_pattern(pattern).await;
        }

        info!("🧹 Invalidated product cache (product: {product_id:?}, lists removed: {removed})");
    }

    /// Drops one category's detail entry (when given) and every category list.
    pub async fn invalidate_categories(&self, category_id: Option<i32>) {
        if let Some(id) = category_id {
            self.delete_from_cache(&CacheKey::category_detail(id)).await;
        }

        let mut removed = 0;
        for pattern in CacheKey::CATEGORY_PATTERNS {
            removed += self.delete_pattern(pattern).await;
        }

        info!(
            "🧹 Invalidated category cache (category: {category_id:?}, lists removed: {removed})"
        );
    }
}
