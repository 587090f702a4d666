use crate::model::{Cart, CartItem};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CartItemResponse {
    pub id: i32,
    pub product: i32,
    pub product_name: String,
    #[schema(value_type = String)]
    pub product_price: Decimal,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub product_in_stock: bool,
    pub created_at: NaiveDateTime,
}

impl From<CartItem> for CartItemResponse {
    fn from(value: CartItem) -> Self {
        CartItemResponse {
            total_price: value.product_price * Decimal::from(value.quantity),
            product_in_stock: value.product_stock > 0,
            id: value.id,
            product: value.product_id,
            product_name: value.product_name,
            product_price: value.product_price,
            quantity: value.quantity,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CartResponse {
    pub id: i32,
    pub user: i32,
    pub items: Vec<CartItemResponse>,
    pub total_items: i64,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CartResponse {
    pub fn new(cart: Cart, items: Vec<CartItem>) -> Self {
        let items: Vec<CartItemResponse> = items.into_iter().map(CartItemResponse::from).collect();
        let total_items: i64 = items.iter().map(|i| i64::from(i.quantity)).sum();
        let total_price: Decimal = items.iter().map(|i| i.total_price).sum();

        CartResponse {
            id: cart.id,
            user: cart.user_id,
            items,
            total_items,
            total_price,
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn line(id: i32, price: &str, quantity: i32) -> CartItem {
        let now = Utc::now().naive_utc();
        CartItem {
            id,
            cart_id: 1,
            product_id: id,
            product_name: format!("product {id}"),
            product_price: Decimal::from_str(price).unwrap(),
            product_stock: 5,
            product_is_active: true,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn totals_sum_every_line() {
        let now = Utc::now().naive_utc();
        let cart = Cart {
            id: 1,
            user_id: 9,
            created_at: now,
            updated_at: now,
        };

        let response = CartResponse::new(cart, vec![line(1, "10.50", 2), line(2, "3.25", 4)]);

        assert_eq!(response.total_items, 6);
        assert_eq!(response.total_price, Decimal::from_str("34.00").unwrap());
        assert_eq!(response.items[0].total_price, Decimal::from_str("21.00").unwrap());
    }
}
