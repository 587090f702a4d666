use crate::model::Product;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "599.99")]
    pub price: Decimal,
    pub stock: i32,
    pub category: i32,
    pub category_name: String,
    pub is_active: bool,
    pub in_stock: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for ProductResponse {
    fn from(value: Product) -> Self {
        ProductResponse {
            in_stock: value.stock > 0,
            id: value.id,
            name: value.name,
            description: value.description,
            price: value.price,
            stock: value.stock,
            category: value.category_id,
            category_name: value.category_name,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Compact row used by list endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProductListResponse {
    pub id: i32,
    pub name: String,
    #[schema(value_type = String, example = "599.99")]
    pub price: Decimal,
    pub stock: i32,
    pub category_name: String,
    pub in_stock: bool,
    pub is_active: bool,
}

impl From<Product> for ProductListResponse {
    fn from(value: Product) -> Self {
        ProductListResponse {
            in_stock: value.stock > 0,
            id: value.id,
            name: value.name,
            price: value.price,
            stock: value.stock,
            category_name: value.category_name,
            is_active: value.is_active,
        }
    }
}
