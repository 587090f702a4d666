use super::with_items;
use crate::{
    abstract_trait::{
        DynCartQueryRepository, DynNotifier, DynOrderCommandRepository, DynOrderQueryRepository,
        OrderCommandServiceTrait,
    },
    cache::{CacheKey, CacheStore},
    domain::{
        enums::OrderStatus,
        event::{ADMIN_ORDERS_GROUP, OrderEvent, user_group},
        requests::{CreateOrderRequest, PlaceOrder, PlaceOrderLine, UpdateOrderStatusRequest},
        responses::{ApiResponse, OrderResponse, Session},
    },
    errors::{RepositoryError, ServiceError},
    model::{CartItem, Order},
    utils::{Method, ServiceTracer},
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use rust_decimal::Decimal;
use tracing::info;

pub struct OrderCommandServiceDeps {
    pub query: DynOrderQueryRepository,
    pub command: DynOrderCommandRepository,
    pub cart_query: DynCartQueryRepository,
    pub cache: CacheStore,
    pub notifier: DynNotifier,
}

#[derive(Clone)]
pub struct OrderCommandService {
    query: DynOrderQueryRepository,
    command: DynOrderCommandRepository,
    cart_query: DynCartQueryRepository,
    cache: CacheStore,
    notifier: DynNotifier,
    tracer: ServiceTracer,
}

/// Turns cart lines into an order draft, refusing lines the stock can't cover.
fn draft_order(
    user_id: i32,
    cart_id: i32,
    shipping_address: &str,
    items: &[CartItem],
) -> Result<PlaceOrder, ServiceError> {
    if items.is_empty() {
        return Err(ServiceError::validation("Cart is empty"));
    }

    if let Some(short) = items.iter().find(|item| item.quantity > item.product_stock) {
        return Err(ServiceError::validation(format!(
            "Insufficient stock for {}. Available: {}",
            short.product_name, short.product_stock
        )));
    }

    let lines: Vec<PlaceOrderLine> = items
        .iter()
        .map(|item| PlaceOrderLine {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            price: item.product_price,
        })
        .collect();

    let total_price: Decimal = lines
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum();

    Ok(PlaceOrder {
        user_id,
        cart_id,
        shipping_address: shipping_address.trim().to_string(),
        total_price,
        lines,
    })
}

impl OrderCommandService {
    pub fn new(deps: OrderCommandServiceDeps, registry: &mut Registry) -> Self {
        Self {
            query: deps.query,
            command: deps.command,
            cart_query: deps.cart_query,
            cache: deps.cache,
            notifier: deps.notifier,
            tracer: ServiceTracer::new("order-command-service", registry),
        }
    }

    async fn place(
        &self,
        session: &Session,
        req: &CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        let Some(cart) = self.cart_query.find_by_user(session.user_id).await? else {
            return Err(ServiceError::validation("Cart is empty"));
        };

        let items = self.cart_query.find_items(cart.id).await?;
        let draft = draft_order(session.user_id, cart.id, &req.shipping_address, &items)?;

        let order = self.command.place_order(&draft).await.map_err(|e| match e {
            RepositoryError::Conflict(msg) => ServiceError::validation(msg),
            other => ServiceError::Repo(other),
        })?;

        info!(
            "🧾 Order #{} placed by {} ({} lines, total {})",
            order.id,
            session.username,
            draft.lines.len(),
            order.total_price
        );

        for line in &draft.lines {
            self.cache
                .delete_from_cache(&CacheKey::product_detail(line.product_id))
                .await;
        }
        self.cache.invalidate_products(None).await;

        self.announce_new_order(session, &order).await;

        let mut responses = with_items(&self.query, vec![order]).await?;
        responses
            .pop()
            .ok_or_else(|| ServiceError::Internal("Order vanished while loading".to_string()))
    }

    async fn announce_new_order(&self, session: &Session, order: &Order) {
        let timestamp = Utc::now();

        let to_customer = OrderEvent::OrderCreated {
            order_id: order.id,
            message: format!("Your order #{} has been created successfully!", order.id),
            timestamp,
        };
        let to_admins = OrderEvent::NewOrder {
            order_id: order.id,
            user_id: session.user_id,
            user_name: session.username.clone(),
            total_price: order.total_price.to_string(),
            message: format!("New order #{} created by {}", order.id, session.username),
            timestamp,
        };

        let customers = self
            .notifier
            .publish(&user_group(session.user_id), to_customer)
            .await;
        let admins = self.notifier.publish(ADMIN_ORDERS_GROUP, to_admins).await;

        info!("📣 Order #{} announced to {customers} customer and {admins} admin sockets", order.id);
    }

    async fn announce_status_change(&self, order: &Order, old: OrderStatus, new: OrderStatus) {
        let timestamp = Utc::now();

        let to_customer = OrderEvent::OrderUpdate {
            order_id: order.id,
            old_status: old.to_string(),
            new_status: new.to_string(),
            message: format!("Your order #{} status has been updated to {new}", order.id),
            timestamp,
        };
        let to_admins = OrderEvent::OrderStatusChanged {
            order_id: order.id,
            user_id: order.user_id,
            old_status: old.to_string(),
            new_status: new.to_string(),
            message: format!("Order #{} status changed from {old} to {new}", order.id),
            timestamp,
        };

        self.notifier
            .publish(&user_group(order.user_id), to_customer)
            .await;
        self.notifier.publish(ADMIN_ORDERS_GROUP, to_admins).await;
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(
        &self,
        session: &Session,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "order_create",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("user_id", session.user_id.to_string()),
            ],
        );

        let result = self.place(session, req).await;

        self.tracer
            .finish(&tracing_ctx, Method::Post, result, "Order created")
            .map(|order| ApiResponse::success("Order created successfully", order))
    }

    async fn update_status(
        &self,
        id: i32,
        req: &UpdateOrderStatusRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "order_update_status",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order_id", id.to_string()),
                KeyValue::new("status", req.status.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            let change = self
                .command
                .update_status(id, req.status)
                .await
                .map_err(|e| match e {
                    RepositoryError::NotFound => ServiceError::not_found("Order not found"),
                    RepositoryError::Conflict(msg) => ServiceError::validation(msg),
                    RepositoryError::Custom(msg) => ServiceError::Internal(msg),
                    other => ServiceError::Repo(other),
                })?;

            self.announce_status_change(&change.order, change.previous, req.status)
                .await;

            let mut responses = with_items(&self.query, vec![change.order]).await?;
            responses
                .pop()
                .ok_or_else(|| ServiceError::Internal("Order vanished while loading".to_string()))
        }
        .await;

        let message = format!("Order status updated to {}", req.status);
        self.tracer
            .finish(&tracing_ctx, Method::Patch, result, &message)
            .map(|order| ApiResponse::success(message, order))
    }
}
