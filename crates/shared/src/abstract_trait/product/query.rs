use crate::{
    domain::{
        requests::FindAllProducts,
        responses::{
            ApiResponse, ApiResponsePagination, CacheLookup, ProductListResponse,
            ProductResponse,
        },
    },
    errors::{RepositoryError, ServiceError},
    model::Product as ProductModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;
pub type DynProductQueryService = Arc<dyn ProductQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryRepositoryTrait {
    /// With `active_only` the `is_active` filter is forced to `true`.
    async fn find_all(
        &self,
        req: &FindAllProducts,
        active_only: bool,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError>;
}

#[async_trait]
pub trait ProductQueryServiceTrait {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductListResponse>>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn find_public(
        &self,
        req: &FindAllProducts,
    ) -> Result<CacheLookup<ApiResponsePagination<Vec<ProductListResponse>>>, ServiceError>;
    async fn find_public_by_id(
        &self,
        id: i32,
    ) -> Result<CacheLookup<ApiResponse<ProductResponse>>, ServiceError>;
}
