use crate::{
    abstract_trait::{DynProductQueryRepository, ProductQueryServiceTrait},
    cache::{CacheKey, CacheStore},
    domain::{
        requests::{FindAllProducts, PageRequest},
        responses::{
            ApiResponse, ApiResponsePagination, CacheLookup, Pagination, ProductListResponse,
            ProductResponse,
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
pub struct ProductQueryService {
    query: DynProductQueryRepository,
    cache: CacheStore,
    tracer: ServiceTracer,
}

impl ProductQueryService {
    pub fn new(query: DynProductQueryRepository, cache: CacheStore, registry: &mut Registry) -> Self {
        Self {
            query,
            cache,
            tracer: ServiceTracer::new("product-query-service", registry),
        }
    }

    async fn load_page(
        &self,
        req: &FindAllProducts,
        active_only: bool,
    ) -> Result<ApiResponsePagination<Vec<ProductListResponse>>, ServiceError> {
        let page = PageRequest::new(req.page, req.page_size);

        let (products, total) = match self.query.find_all(req, active_only).await {
            Ok(res) => {
                info!("✅ Retrieved {} products from DB", res.0.len());
                res
            }
            Err(e) => {
                error!("❌ Failed to fetch products: {e:?}");
                return Err(ServiceError::Repo(e));
            }
        };

        let data: Vec<ProductListResponse> =
            products.into_iter().map(ProductListResponse::from).collect();

        Ok(ApiResponsePagination::success(
            "Products retrieved successfully",
            data,
            Pagination::new(&page, total),
        ))
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductListResponse>>, ServiceError> {
        info!(
            "🔍 Finding all products | Page: {:?}, Size: {:?}, Search: {:?}",
            req.page, req.page_size, req.search
        );

        let tracing_ctx = self.tracer.start(
            "product_find_all",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "find_all"),
                KeyValue::new("search", req.search.clone().unwrap_or_default()),
            ],
        );

        let result = self.load_page(req, false).await;
        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "Products retrieved")
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "product_find_by_id",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product_id", id.to_string()),
            ],
        );

        let result = match self.query.find_by_id(id).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(ServiceError::not_found(format!(
                "Product with id {id} not found"
            ))),
            Err(e) => Err(ServiceError::Repo(e)),
        };

        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "Product retrieved")
            .map(|product| ApiResponse::success("Product retrieved successfully", product.into()))
    }

    async fn find_public(
        &self,
        req: &FindAllProducts,
    ) -> Result<CacheLookup<ApiResponsePagination<Vec<ProductListResponse>>>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "product_find_public",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "find_public"),
            ],
        );

        // The active flag is forced, so it must not split the cache key.
        let req = FindAllProducts {
            is_active: None,
            ..req.clone()
        };
        let cache_key = CacheKey::product_list(&req);

        if let Some(cached) = self
            .cache
            .get_from_cache::<ApiResponsePagination<Vec<ProductListResponse>>>(&cache_key)
            .await
        {
            info!("✅ Found {} products in cache", cached.data.len());
            self.tracer
                .complete_success(&tracing_ctx, Method::Get, "Products retrieved from cache");
            return Ok(CacheLookup::hit(cached));
        }

        let response = match self.load_page(&req, true).await {
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
            .complete_success(&tracing_ctx, Method::Get, "Products retrieved from DB");

        Ok(CacheLookup::miss(response))
    }

    async fn find_public_by_id(
        &self,
        id: i32,
    ) -> Result<CacheLookup<ApiResponse<ProductResponse>>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "product_find_public_by_id",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product_id", id.to_string()),
            ],
        );

        let cache_key = CacheKey::product_detail(id);

        if let Some(cached) = self
            .cache
            .get_from_cache::<ProductResponse>(&cache_key)
            .await
        {
            self.tracer
                .complete_success(&tracing_ctx, Method::Get, "Product retrieved from cache");
            return Ok(CacheLookup::hit(ApiResponse::success(
                "Product retrieved successfully",
                cached,
            )));
        }

        let result = match self.query.find_by_id(id).await {
            Ok(Some(product)) if product.is_active => Ok(ProductResponse::from(product)),
            Ok(_) => Err(ServiceError::not_found(format!(
                "Product with id {id} not found"
            ))),
            Err(e) => Err(ServiceError::Repo(e)),
        };

        if let Ok(product) = &result {
            self.cache
                .set_to_cache(&cache_key, product, self.cache.default_ttl())
                .await;
        }

        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "Product retrieved")
            .map(|product| {
                CacheLookup::miss(ApiResponse::success(
                    "Product retrieved successfully",
                    product,
                ))
            })
    }
}
