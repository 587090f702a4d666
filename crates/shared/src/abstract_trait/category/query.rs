use crate::{
    domain::{
        requests::FindAllCategories,
        responses::{ApiResponse, ApiResponsePagination, CacheLookup, CategoryResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::Category as CategoryModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynCategoryQueryRepository = Arc<dyn CategoryQueryRepositoryTrait + Send + Sync>;
pub type DynCategoryQueryService = Arc<dyn CategoryQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait CategoryQueryRepositoryTrait {
    async fn find_all(
        &self,
        req: &FindAllCategories,
    ) -> Result<(Vec<CategoryModel>, i64), RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<CategoryModel>, RepositoryError>;
}

#[async_trait]
pub trait CategoryQueryServiceTrait {
    async fn find_all(
        &self,
        req: &FindAllCategories,
    ) -> Result<ApiResponsePagination<Vec<CategoryResponse>>, ServiceError>;
    /// Cache-aside listing for anonymous callers.
    async fn find_public(
        &self,
        req: &FindAllCategories,
    ) -> Result<CacheLookup<ApiResponsePagination<Vec<CategoryResponse>>>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<CategoryResponse>, ServiceError>;
}
