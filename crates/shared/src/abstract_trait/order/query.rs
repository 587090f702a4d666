use crate::{
    domain::{
        requests::FindAllOrders,
        responses::{ApiResponse, ApiResponsePagination, OrderResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::{Order as OrderModel, OrderItem as OrderItemModel},
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;
pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryRepositoryTrait {
    /// `owner` restricts the listing to one user's orders.
    async fn find_all(
        &self,
        req: &FindAllOrders,
        owner: Option<i32>,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, RepositoryError>;
    async fn find_items(&self, order_ids: &[i32]) -> Result<Vec<OrderItemModel>, RepositoryError>;
}

#[async_trait]
pub trait OrderQueryServiceTrait {
    async fn find_all(
        &self,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError>;
    async fn find_by_user(
        &self,
        user_id: i32,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn find_by_id_for_user(
        &self,
        id: i32,
        user_id: i32,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}
