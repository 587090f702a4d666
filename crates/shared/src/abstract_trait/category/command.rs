use crate::{
    domain::{
        requests::{CreateCategoryRequest, UpdateCategoryRequest},
        responses::{ApiResponse, CategoryResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::Category as CategoryModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynCategoryCommandRepository = Arc<dyn CategoryCommandRepositoryTrait + Send + Sync>;
pub type DynCategoryCommandService = Arc<dyn CategoryCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait CategoryCommandRepositoryTrait {
    async fn create_category(
        &self,
        req: &CreateCategoryRequest,
    ) -> Result<CategoryModel, RepositoryError>;
    async fn update_category(
        &self,
        id: i32,
        req: &UpdateCategoryRequest,
    ) -> Result<CategoryModel, RepositoryError>;
    async fn delete_category(&self, id: i32) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait CategoryCommandServiceTrait {
    async fn create_category(
        &self,
        req: &CreateCategoryRequest,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError>;
    async fn update_category(
        &self,
        id: i32,
        req: &UpdateCategoryRequest,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError>;
    async fn delete_category(&self, id: i32) -> Result<ApiResponse<()>, ServiceError>;
}
