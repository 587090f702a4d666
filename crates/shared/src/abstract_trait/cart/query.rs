use crate::{
    errors::RepositoryError,
    model::{Cart as CartModel, CartItem as CartItemModel},
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynCartQueryRepository = Arc<dyn CartQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait CartQueryRepositoryTrait {
    async fn find_by_user(&self, user_id: i32) -> Result<Option<CartModel>, RepositoryError>;
    async fn find_items(&self, cart_id: i32) -> Result<Vec<CartItemModel>, RepositoryError>;
    async fn find_item_by_product(
        &self,
        cart_id: i32,
        product_id: i32,
    ) -> Result<Option<CartItemModel>, RepositoryError>;
    async fn find_item_by_id(
        &self,
        cart_id: i32,
        item_id: i32,
    ) -> Result<Option<CartItemModel>, RepositoryError>;
}
