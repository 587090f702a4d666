use crate::{
    abstract_trait::CacheAdminServiceTrait,
    cache::CacheStore,
    domain::responses::{ApiResponse, CacheStatsResponse},
    errors::ServiceError,
    utils::{Method, ServiceTracer},
};
use anyhow::Result;
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::collections::BTreeMap;
use tracing::{error, info};

#[derive(Clone)]
pub struct CacheAdminService {
    cache: CacheStore,
    tracer: ServiceTracer,
}

impl CacheAdminService {
    pub fn new(cache: CacheStore, registry: &mut Registry) -> Self {
        Self {
            cache,
            tracer: ServiceTracer::new("cache-admin-service", registry),
        }
    }
}

#[async_trait]
impl CacheAdminServiceTrait for CacheAdminService {
    /// Backend failures are reported in the payload, not as an error.
    async fn stats(&self) -> Result<ApiResponse<CacheStatsResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "cache_stats",
            vec![KeyValue::new("backend", self.cache.backend_name())],
        );

        let cache_stats = match self.cache.stats().await {
            Ok(stats) => stats,
            Err(e) => {
                error!("❌ Failed to read cache stats: {e:?}");
                BTreeMap::from([(
                    "error".to_string(),
                    "Cache stats not available".to_string(),
                )])
            }
        };

        self.tracer
            .complete_success(&tracing_ctx, Method::Get, "Cache stats collected");

        Ok(ApiResponse::success(
            "Cache stats retrieved successfully",
            CacheStatsResponse {
                cache_backend: self.cache.backend_name().to_string(),
                cache_timeout: self.cache.default_ttl().num_seconds(),
                cache_stats,
            },
        ))
    }

    async fn clear_all(&self) -> Result<ApiResponse<()>, ServiceError> {
        let tracing_ctx = self
            .tracer
            .start("cache_clear_all", vec![KeyValue::new("component", "cache")]);

        let result = self.cache.clear().await;
        if result.is_ok() {
            info!("🧹 Cleared the whole cache");
        }

        self.tracer
            .finish(&tracing_ctx, Method::Post, result, "Cache cleared")
            .map(|_| ApiResponse::success("All cache cleared successfully", ()))
    }

    async fn invalidate_products(
        &self,
        product_id: Option<i32>,
    ) -> Result<ApiResponse<()>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "cache_invalidate_products",
            vec![KeyValue::new(
                "product_id",
                product_id.map(|id| id.to_string()).unwrap_or_default(),
            )],
        );

        self.cache.invalidate_products(product_id).await;

        self.tracer
            .complete_success(&tracing_ctx, Method::Post, "Product cache invalidated");

        let message = match product_id {
            Some(id) => format!("Product cache invalidated for product {id}"),
            None => "Product cache invalidated".to_string(),
        };
        Ok(ApiResponse::success(message, ()))
    }

    async fn invalidate_categories(
        &self,
        category_id: Option<i32>,
    ) -> Result<ApiResponse<()>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "cache_invalidate_categories",
            vec![KeyValue::new(
                "category_id",
                category_id.map(|id| id.to_string()).unwrap_or_default(),
            )],
        );

        self.cache.invalidate_categories(category_id).await;

        self.tracer
            .complete_success(&tracing_ctx, Method::Post, "Category cache invalidated");

        let message = match category_id {
            Some(id) => format!("Category cache invalidated for category {id}"),
            None => "Category cache invalidated".to_string(),
        };
        Ok(ApiResponse::success(message, ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fakes::memory_cache;
    use chrono::Duration;

    #[tokio::test]
    async fn stats_describe_the_memory_backend() {
        let mut registry = Registry::default();
        let admin = CacheAdminService::new(memory_cache(), &mut registry);

        let stats = admin.stats().await.unwrap().data;
        assert_eq!(stats.cache_backend, "memory");
        assert_eq!(stats.cache_timeout, 3600);
        assert!(stats.cache_stats.contains_key("entries"));
    }

    #[tokio::test]
    async fn clear_all_drops_everything() {
        let cache = memory_cache();
        let mut registry = Registry::default();
        let admin = CacheAdminService::new(cache.clone(), &mut registry);

        cache.set_to_cache("session:1", &1, Duration::minutes(5)).await;
        cache
            .set_to_cache("public_products:list:{}", &1, Duration::minutes(5))
            .await;

        admin.clear_all().await.unwrap();

        assert!(cache.get_from_cache::<i32>("session:1").await.is_none());
        assert!(cache.get_from_cache::<i32>("public_products:list:{}").await.is_none());
    }

    #[tokio::test]
    async fn targeted_invalidation_leaves_other_resources() {
        let cache = memory_cache();
        let mut registry = Registry::default();
        let admin = CacheAdminService::new(cache.clone(), &mut registry);

        cache
            .set_to_cache("product_detail_3", &1, Duration::minutes(5))
            .await;
        cache
            .set_to_cache("category_detail_3", &1, Duration::minutes(5))
            .await;

        let response = admin.invalidate_products(Some(3)).await.unwrap();
        assert_eq!(response.message, "Product cache invalidated for product 3");

        assert!(cache.get_from_cache::<i32>("product_detail_3").await.is_none());
        assert!(cache.get_from_cache::<i32>("category_detail_3").await.is_some());
    }
}
