use crate::{
    domain::enums::OrderStatus,
    model::{Order, OrderItem},
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderItemResponse {
    pub id: i32,
    pub product: i32,
    pub product_name: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub price: Decimal,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub created_at: NaiveDateTime,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(value: OrderItem) -> Self {
        OrderItemResponse {
            total_price: value.price * Decimal::from(value.quantity),
            id: value.id,
            product: value.product_id,
            product_name: value.product_name,
            quantity: value.quantity,
            price: value.price,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderResponse {
    pub id: i32,
    pub user: i32,
    pub user_name: String,
    pub status: OrderStatus,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub shipping_address: String,
    pub items: Vec<OrderItemResponse>,
    pub total_items: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl OrderResponse {
    pub fn new(order: Order, items: Vec<OrderItem>) -> Self {
        let items: Vec<OrderItemResponse> =
            items.into_iter().map(OrderItemResponse::from).collect();
        let total_items: i64 = items.iter().map(|i| i64::from(i.quantity)).sum();

        OrderResponse {
            status: order.status.parse().unwrap_or(OrderStatus::Pending),
            id: order.id,
            user: order.user_id,
            user_name: order.user_name,
            total_price: order.total_price,
            shipping_address: order.shipping_address,
            items,
            total_items,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
