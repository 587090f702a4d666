use crate::{
    domain::{
        enums::OrderStatus,
        requests::{CreateOrderRequest, PlaceOrder, UpdateOrderStatusRequest},
        responses::{ApiResponse, OrderResponse, Session},
    },
    errors::{RepositoryError, ServiceError},
    model::{Order as OrderModel, OrderStatusChange},
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;
pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Writes the order and its lines, takes the stock and removes the ordered
    /// lines from the cart in one transaction. A line whose stock ran out in
    /// the meantime yields `RepositoryError::Conflict`.
    async fn place_order(&self, req: &PlaceOrder) -> Result<OrderModel, RepositoryError>;
    /// Moves the order to `status` under a row lock. A finished order asked to
    /// reopen yields `RepositoryError::Conflict` and nothing is written.
    async fn update_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<OrderStatusChange, RepositoryError>;
}

#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn create_order(
        &self,
        session: &Session,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn update_status(
        &self,
        id: i32,
        req: &UpdateOrderStatusRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}
