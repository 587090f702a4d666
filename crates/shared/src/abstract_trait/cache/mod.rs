use crate::{
    domain::responses::{ApiResponse, CacheStatsResponse},
    errors::ServiceError,
};
use anyhow::Result;
use async_trait::async_trait;
use std::{collections::BTreeMap, sync::Arc, time::Duration};

pub type DynCacheBackend = Arc<dyn CacheBackendTrait + Send + Sync>;
pub type DynCacheAdminService = Arc<dyn CacheAdminServiceTrait + Send + Sync>;

/// Raw string storage behind [`crate::cache::CacheStore`].
#[async_trait]
pub trait CacheBackendTrait {
    fn name(&self) -> &'static str;
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError>;
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), ServiceError>;
    async fn delete(&self, key: &str) -> Result<(), ServiceError>;
    /// Deletes every key matching a `*` glob; returns the number removed.
    async fn delete_pattern(&self, pattern: &str) -> Result<u64, ServiceError>;
    /// Increments a counter, starting its TTL when it is created.
    async fn incr(&self, key: &str, ttl: Duration) -> Result<i64, ServiceError>;
    async fn clear(&self) -> Result<(), ServiceError>;
    async fn stats(&self) -> Result<BTreeMap<String, String>, ServiceError>;
}

#[async_trait]
pub trait CacheAdminServiceTrait {
    async fn stats(&self) -> Result<ApiResponse<CacheStatsResponse>, ServiceError>;
    async fn clear_all(&self) -> Result<ApiResponse<()>, ServiceError>;
    async fn invalidate_products(
        &self,
        product_id: Option<i32>,
    ) -> Result<ApiResponse<()>, ServiceError>;
    async fn invalidate_categories(
        &self,
        category_id: Option<i32>,
    ) -> Result<ApiResponse<()>, ServiceError>;
}
