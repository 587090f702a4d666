use crate::{domain::enums::OrderStatus, utils::deserialize_optional_datetime};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::from("Shipping address cannot be empty")));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateOrderRequest {
    #[validate(
        length(max = 500, message = "Shipping address must be at most 500 characters"),
        custom(function = "not_blank")
    )]
    #[schema(example = "Jl. Merdeka 10, Bandung")]
    pub shipping_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindAllOrders {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Owner user id.
    pub user: Option<i32>,
    /// Owner username contains (case-insensitive).
    pub user_name: Option<String>,
    pub status: Option<OrderStatus>,
    #[param(value_type = Option<String>)]
    pub min_total: Option<Decimal>,
    #[param(value_type = Option<String>)]
    pub max_total: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub created_after: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub created_before: Option<NaiveDateTime>,
    /// Matches username, email or shipping address.
    pub search: Option<String>,
    /// `created_at`, `total_price`, `status`; prefix with `-` for descending.
    pub ordering: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PlaceOrderLine {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// A validated cart snapshot ready to be written as an order.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub user_id: i32,
    pub cart_id: i32,
    pub shipping_address: String,
    pub total_price: Decimal,
    pub lines: Vec<PlaceOrderLine>,
}

impl PlaceOrder {
    /// Products priced into this draft; only these lines leave the cart.
    pub fn product_ids(&self) -> Vec<i32> {
        self.lines.iter().map(|line| line.product_id).collect()
    }
}
