use crate::{
    abstract_trait::{CategoryQueryServiceTrait, DynCategoryQueryRepository},
    cache::{CacheKey, CacheStore},
    domain::{
        requests::{FindAllCategories, PageRequest},
        responses::{
            ApiResponse, ApiResponsePagination, CacheLookup, CategoryResponse, Pagination,
        },
    },
    errors::ServiceError,
    utils::{Method, ServiceTracer},
};
use anyhow::Result;
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use tracing::{error, info};

#[derive(Clone)]
pub struct CategoryQueryService {
    query: DynCategoryQueryRepository,
    cache: CacheStore,
    tracer: ServiceTracer,
}

impl CategoryQueryService {
    pub fn new(query: DynCategoryQueryRepository, cache: CacheStore, registry: &mut Registry) -> Self {
        Self {
            query,
            cache,
            tracer: ServiceTracer::new("category-query-service", registry),
        }
    }

    async fn load_page(
        &self,
        req: &FindAllCategories,
    ) -> Result<ApiResponsePagination<Vec<CategoryResponse>>, ServiceError> {
        let page = PageRequest::new(req.page, req.page_size);

        let (categories, total) = self.query.find_all(req).await.map_err(|e| {
            error!("❌ Failed to fetch categories: {e:?}");
            ServiceError::Repo(e)
        })?;

        let data: Vec<CategoryResponse> =
            categories.into_iter().map(CategoryResponse::from).collect();

        info!("✅ Found {} categories (total: {total})", data.len());

        Ok(ApiResponsePagination::success(
            "Categories retrieved successfully",
            data,
            Pagination::new(&page, total),
        ))
    }
}

#[async_trait]
impl CategoryQueryServiceTrait for CategoryQueryService {
    async fn find_all(
        &self,
        req: &FindAllCategories,
    ) -> Result<ApiResponsePagination<Vec<CategoryResponse>>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "category_find_all",
            vec![
                KeyValue::new("component", "category"),
                KeyValue::new("search", req.search.clone().unwrap_or_default()),
            ],
        );

        let result = self.load_page(req).await;
        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "Categories retrieved")
    }

    async fn find_public(
        &self,
        req: &FindAllCategories,
    ) -> Result<CacheLookup<ApiResponsePagination<Vec<CategoryResponse>>>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "category_find_public",
            vec![KeyValue::new("component", "category")],
        );

        let cache_key = CacheKey::category_list(req);

        if let Some(cached) = self
            .cache
            .get_from_cache::<ApiResponsePagination<Vec<CategoryResponse>>>(&cache_key)
            .await
        {
            info!("✅ Found {} categories in cache", cached.data.len());
            self.tracer.complete_success(
                &tracing_ctx,
                Method::Get,
                "Categories retrieved from cache",
            );
            return Ok(CacheLookup::hit(cached));
        }

        let response = match self.load_page(req).await {
            Ok(response) => response,
            Err(e) => {
                self.tracer
                    .complete_error(&tracing_ctx, Method::Get, &e.to_string());
                return Err(e);
            }
        };

        self.cache
            .set_to_cache(&cache_key, &response, self.cache.default_ttl())
            .await;

        self.tracer
            .complete_success(&tracing_ctx, Method::Get, "Categories retrieved from DB");

        Ok(CacheLookup::miss(response))
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<CategoryResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "category_find_by_id",
            vec![
                KeyValue::new("component", "category"),
                KeyValue::new("category_id", id.to_string()),
            ],
        );

        let cache_key = CacheKey::category_detail(id);

        if let Some(cached) = self
            .cache
            .get_from_cache::<CategoryResponse>(&cache_key)
            .await
        {
            self.tracer
                .complete_success(&tracing_ctx, Method::Get, "Category retrieved from cache");
            return Ok(ApiResponse::success("Category retrieved successfully", cached));
        }

        let result = match self.query.find_by_id(id).await {
            Ok(Some(category)) => Ok(CategoryResponse::from(category)),
            Ok(None) => Err(ServiceError::not_found(format!(
                "Category with id {id} not found"
            ))),
            Err(e) => Err(ServiceError::Repo(e)),
        };

        if let Ok(category) = &result {
            self.cache
                .set_to_cache(&cache_key, category, self.cache.default_ttl())
                .await;
        }

        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "Category retrieved")
            .map(|data| ApiResponse::success("Category retrieved successfully", data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fakes::{FakeStore, memory_cache};

    #[tokio::test]
    async fn public_listing_is_served_from_cache_the_second_time() {
        let store = FakeStore::new();
        let mut registry = Registry::default();
        let categories = CategoryQueryService::new(store.clone(), memory_cache(), &mut registry);
        store.insert_category("Books");

        let req = FindAllCategories::default();
        let first = categories.find_public(&req).await.unwrap();
        assert!(!first.hit);
        assert_eq!(first.data.data.len(), 1);

        store.insert_category("Games");

        let second = categories.find_public(&req).await.unwrap();
        assert!(second.hit);
        assert_eq!(second.data.data.len(), 1);

        let admin_view = categories.find_all(&req).await.unwrap();
        assert_eq!(admin_view.data.len(), 2);
    }

    #[tokio::test]
    async fn different_filters_use_different_entries() {
        let store = FakeStore::new();
        let mut registry = Registry::default();
        let categories = CategoryQueryService::new(store.clone(), memory_cache(), &mut registry);
        store.insert_category("Books");
        store.insert_category("Games");

        categories
            .find_public(&FindAllCategories::default())
            .await
            .unwrap();

        let filtered = categories
            .find_public(&FindAllCategories {
                name: Some("gam".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!filtered.hit);
        assert_eq!(filtered.data.data.len(), 1);
        assert_eq!(filtered.data.data[0].name, "Games");
    }

    #[tokio::test]
    async fn missing_category_is_not_found() {
        let store = FakeStore::new();
        let mut registry = Registry::default();
        let categories = CategoryQueryService::new(store, memory_cache(), &mut registry);

        assert!(matches!(
            categories.find_by_id(42).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
