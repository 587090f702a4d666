use crate::{
    abstract_trait::{
        CartServiceTrait, DynCartCommandRepository, DynCartQueryRepository,
        DynProductQueryRepository,
    },
    domain::{
        requests::{AddToCartRequest, UpdateCartItemRequest},
        responses::{ApiResponse, CartResponse},
    },
    errors::ServiceError,
    model::{CartItem, Product},
    utils::{Method, ServiceTracer},
};
use anyhow::Result;
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use tracing::info;

/// Quantity a line ends up with after adding `added` units; never above stock.
pub fn merged_quantity(existing: i32, added: i32, stock: i32) -> i32 {
    existing.saturating_add(added).min(stock)
}

pub struct CartServiceDeps {
    pub query: DynCartQueryRepository,
    pub command: DynCartCommandRepository,
    pub product_query: DynProductQueryRepository,
}

#[derive(Clone)]
pub struct CartService {
    query: DynCartQueryRepository,
    command: DynCartCommandRepository,
    product_query: DynProductQueryRepository,
    tracer: ServiceTracer,
}

impl CartService {
    pub fn new(deps: CartServiceDeps, registry: &mut Registry) -> Self {
        Self {
            query: deps.query,
            command: deps.command,
            product_query: deps.product_query,
            tracer: ServiceTracer::new("cart-service", registry),
        }
    }

    async fn snapshot(&self, user_id: i32) -> Result<CartResponse, ServiceError> {
        let cart = self.command.get_or_create(user_id).await?;
        let items = self.query.find_items(cart.id).await?;
        Ok(CartResponse::new(cart, items))
    }

    async fn purchasable_product(&self, product_id: i32) -> Result<Product, ServiceError> {
        match self.product_query.find_by_id(product_id).await? {
            Some(product) if product.is_active => Ok(product),
            _ => Err(ServiceError::not_found("Product not found")),
        }
    }

    async fn owned_item(&self, user_id: i32, item_id: i32) -> Result<CartItem, ServiceError> {
        let cart = self
            .query
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart item not found"))?;

        self.query
            .find_item_by_id(cart.id, item_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart item not found"))
    }
}

#[async_trait]
impl CartServiceTrait for CartService {
    async fn get_cart(&self, user_id: i32) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "cart_get",
            vec![
                KeyValue::new("component", "cart"),
                KeyValue::new("user_id", user_id.to_string()),
            ],
        );

        let result = self.snapshot(user_id).await;

        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "Cart retrieved")
            .map(|cart| ApiResponse::success("Cart retrieved successfully", cart))
    }

    async fn add_item(
        &self,
        user_id: i32,
        req: &AddToCartRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        info!(
            "🛒 User {user_id} adding product {} x{}",
            req.product_id, req.quantity
        );

        let tracing_ctx = self.tracer.start(
            "cart_add_item",
            vec![
                KeyValue::new("component", "cart"),
                KeyValue::new("user_id", user_id.to_string()),
                KeyValue::new("product_id", req.product_id.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            let product = self.purchasable_product(req.product_id).await?;

            if product.stock <= 0 {
                return Err(ServiceError::validation("Product is out of stock"));
            }

            if req.quantity > product.stock {
                return Err(ServiceError::validation(format!(
                    "Only {} items available",
                    product.stock
                )));
            }

            let cart = self.command.get_or_create(user_id).await?;
            let existing = self
                .query
                .find_item_by_product(cart.id, product.id)
                .await?
                .map(|item| item.quantity)
                .unwrap_or(0);

            let quantity = merged_quantity(existing, req.quantity, product.stock);
            self.command.save_item(cart.id, product.id, quantity).await?;

            self.snapshot(user_id).await
        }
        .await;

        self.tracer
            .finish(&tracing_ctx, Method::Post, result, "Item added to cart")
            .map(|cart| ApiResponse::success("Item added to cart successfully", cart))
    }

    async fn update_item(
        &self,
        user_id: i32,
        item_id: i32,
        req: &UpdateCartItemRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "cart_update_item",
            vec![
                KeyValue::new("component", "cart"),
                KeyValue::new("item_id", item_id.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            let item = self.owned_item(user_id, item_id).await?;

            if req.quantity > item.product_stock {
                return Err(ServiceError::validation(format!(
                    "Only {} items available in stock",
                    item.product_stock
                )));
            }

            self.command
                .update_item_quantity(item.id, req.quantity)
                .await?;

            self.snapshot(user_id).await
        }
        .await;

        self.tracer
            .finish(&tracing_ctx, Method::Patch, result, "Cart item updated")
            .map(|cart| ApiResponse::success("Cart item updated successfully", cart))
    }

    async fn remove_item(
        &self,
        user_id: i32,
        item_id: i32,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "cart_remove_item",
            vec![
                KeyValue::new("component", "cart"),
                KeyValue::new("item_id", item_id.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            let item = self.owned_item(user_id, item_id).await?;
            self.command.remove_item(item.id).await?;
            self.snapshot(user_id).await
        }
        .await;

        self.tracer
            .finish(&tracing_ctx, Method::Delete, result, "Cart item removed")
            .map(|cart| ApiResponse::success("Item removed from cart successfully", cart))
    }

    async fn clear_cart(&self, user_id: i32) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "cart_clear",
            vec![
                KeyValue::new("component", "cart"),
                KeyValue::new("user_id", user_id.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            let cart = self.command.get_or_create(user_id).await?;
            self.command.clear(cart.id).await?;
            Ok(CartResponse::new(cart, Vec::new()))
        }
        .await;

        self.tracer
            .finish(&tracing_ctx, Method::Delete, result, "Cart cleared")
            .map(|cart| ApiResponse::success("Cart cleared successfully", cart))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::enums::UserType,
        model::user_fixtures::user,
        service::fakes::FakeStore,
    };
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn service(store: &Arc<FakeStore>) -> CartService {
        let mut registry = Registry::default();
        CartService::new(
            CartServiceDeps {
                query: store.clone(),
                command: store.clone(),
                product_query: store.clone(),
            },
            &mut registry,
        )
    }

    fn add(product_id: i32, quantity: i32) -> AddToCartRequest {
        AddToCartRequest {
            product_id,
            quantity,
        }
    }

    #[test]
    fn merged_quantity_is_clamped_to_stock() {
        assert_eq!(merged_quantity(0, 2, 5), 2);
        assert_eq!(merged_quantity(4, 3, 5), 5);
        assert_eq!(merged_quantity(i32::MAX, 1, 5), 5);
    }

    #[tokio::test]
    async fn adding_twice_increments_and_clamps() {
        let store = FakeStore::new();
        let carts = service(&store);
        let jane = store.insert_user(user(0, "jane", UserType::Customer));
        let books = store.insert_category("Books");
        let novel = store.insert_product("Novel", Decimal::new(1_250, 2), 5, books.id);

        carts.add_item(jane.id, &add(novel.id, 3)).await.unwrap();
        let cart = carts.add_item(jane.id, &add(novel.id, 4)).await.unwrap().data;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.total_items, 5);
        assert_eq!(cart.total_price, Decimal::new(6_250, 2));
    }

    #[tokio::test]
    async fn add_rejects_more_than_stock_and_inactive_products() {
        let store = FakeStore::new();
        let carts = service(&store);
        let jane = store.insert_user(user(0, "jane", UserType::Customer));
        let books = store.insert_category("Books");
        let novel = store.insert_product("Novel", Decimal::ONE, 2, books.id);
        let retired = store.insert_product("Retired", Decimal::ONE, 2, books.id);
        store.set_product_active(retired.id, false);
        let sold_out = store.insert_product("Sold out", Decimal::ONE, 0, books.id);

        match carts.add_item(jane.id, &add(novel.id, 3)).await {
            Err(ServiceError::Validation(messages)) => {
                assert_eq!(messages, vec!["Only 2 items available".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        assert!(matches!(
            carts.add_item(jane.id, &add(retired.id, 1)).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            carts.add_item(jane.id, &add(sold_out.id, 1)).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            carts.add_item(jane.id, &add(404, 1)).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn items_of_other_users_are_not_found() {
        let store = FakeStore::new();
        let carts = service(&store);
        let jane = store.insert_user(user(0, "jane", UserType::Customer));
        let bob = store.insert_user(user(0, "bob", UserType::Customer));
        let books = store.insert_category("Books");
        let novel = store.insert_product("Novel", Decimal::ONE, 5, books.id);

        let cart = carts.add_item(jane.id, &add(novel.id, 1)).await.unwrap().data;
        let item_id = cart.items[0].id;

        carts.get_cart(bob.id).await.unwrap();
        assert!(matches!(
            carts
                .update_item(bob.id, item_id, &UpdateCartItemRequest { quantity: 2 })
                .await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            carts.remove_item(bob.id, item_id).await,
            Err(ServiceError::NotFound(_))
        ));

        assert!(matches!(
            carts
                .update_item(jane.id, item_id, &UpdateCartItemRequest { quantity: 9 })
                .await,
            Err(ServiceError::Validation(_))
        ));

        let updated = carts
            .update_item(jane.id, item_id, &UpdateCartItemRequest { quantity: 4 })
            .await
            .unwrap()
            .data;
        assert_eq!(updated.total_items, 4);

        let emptied = carts.remove_item(jane.id, item_id).await.unwrap().data;
        assert!(emptied.items.is_empty());
    }

    #[tokio::test]
    async fn clear_empties_the_cart() {
        let store = FakeStore::new();
        let carts = service(&store);
        let jane = store.insert_user(user(0, "jane", UserType::Customer));
        let books = store.insert_category("Books");
        let novel = store.insert_product("Novel", Decimal::ONE, 5, books.id);
        let comic = store.insert_product("Comic", Decimal::ONE, 5, books.id);

        carts.add_item(jane.id, &add(novel.id, 1)).await.unwrap();
        carts.add_item(jane.id, &add(comic.id, 2)).await.unwrap();

        let cleared = carts.clear_cart(jane.id).await.unwrap().data;
        assert_eq!(cleared.total_items, 0);
        assert_eq!(cleared.total_price, Decimal::ZERO);
        assert!(carts.get_cart(jane.id).await.unwrap().data.items.is_empty());
    }
}
