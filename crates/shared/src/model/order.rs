use crate::domain::enums::OrderStatus;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub status: String,
    pub total_price: Decimal,
    pub shipping_address: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: NaiveDateTime,
}

/// An order after a status write, with the status it held under the row lock.
#[derive(Debug, Clone)]
pub struct OrderStatusChange {
    pub order: Order,
    pub previous: OrderStatus,
}
