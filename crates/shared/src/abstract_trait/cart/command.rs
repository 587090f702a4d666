use crate::{
    domain::{
        requests::{AddToCartRequest, UpdateCartItemRequest},
        responses::{ApiResponse, CartResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::Cart as CartModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynCartCommandRepository = Arc<dyn CartCommandRepositoryTrait + Send + Sync>;
pub type DynCartService = Arc<dyn CartServiceTrait + Send + Sync>;

#[async_trait]
pub trait CartCommandRepositoryTrait {
    async fn get_or_create(&self, user_id: i32) -> Result<CartModel, RepositoryError>;
    /// Inserts the line or overwrites the quantity of the existing one.
    async fn save_item(
        &self,
        cart_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<(), RepositoryError>;
    async fn update_item_quantity(&self, item_id: i32, quantity: i32)
    -> Result<(), RepositoryError>;
    async fn remove_item(&self, item_id: i32) -> Result<(), RepositoryError>;
    async fn clear(&self, cart_id: i32) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait CartServiceTrait {
    async fn get_cart(&self, user_id: i32) -> Result<ApiResponse<CartResponse>, ServiceError>;
    async fn add_item(
        &self,
        user_id: i32,
        req: &AddToCartRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError>;
    async fn update_item(
        &self,
        user_id: i32,
        item_id: i32,
        req: &UpdateCartItemRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError>;
    async fn remove_item(
        &self,
        user_id: i32,
        item_id: i32,
    ) -> Result<ApiResponse<CartResponse>, ServiceError>;
    async fn clear_cart(&self, user_id: i32) -> Result<ApiResponse<CartResponse>, ServiceError>;
}
