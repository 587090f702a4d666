use crate::utils::deserialize_optional_datetime;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Fits a `NUMERIC(10, 2)` column and is not negative.
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("price")
            .with_message(Cow::from("Price cannot be negative")));
    }

    if price.normalize().scale() > 2 {
        return Err(ValidationError::new("price")
            .with_message(Cow::from("Price cannot have more than 2 decimal places")));
    }

    if *price > MAX_PRICE {
        return Err(ValidationError::new("price")
            .with_message(Cow::from("Price cannot exceed 99999999.99")));
    }

    Ok(())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindAllProducts {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Name contains (case-insensitive).
    pub name: Option<String>,
    pub description: Option<String>,
    /// Category id.
    pub category: Option<i32>,
    pub category_name: Option<String>,
    #[param(value_type = Option<String>)]
    pub min_price: Option<Decimal>,
    #[param(value_type = Option<String>)]
    pub max_price: Option<Decimal>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub in_stock: Option<bool>,
    pub out_of_stock: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub created_after: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub created_before: Option<NaiveDateTime>,
    /// Ignored on public listings, which only ever show active products.
    pub is_active: Option<bool>,
    /// Matches name, description or category name.
    pub search: Option<String>,
    /// `name`, `price`, `stock`, `created_at`; prefix with `-` for descending.
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[schema(example = "Smartphone")]
    pub name: String,

    #[serde(default)]
    #[schema(example = "6.1 inch OLED")]
    pub description: String,

    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "599.99")]
    pub price: Decimal,

    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    #[schema(example = 100)]
    pub stock: i32,

    #[validate(range(min = 1, message = "Category is required"))]
    #[schema(example = 1)]
    pub category: i32,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "549.99")]
    pub price: Option<Decimal>,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,

    #[validate(range(min = 1, message = "Category is required"))]
    pub category: Option<i32>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStockRequest {
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    #[schema(example = 25)]
    pub stock: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn price_bounds() {
        assert!(validate_price(&dec("0")).is_ok());
        assert!(validate_price(&dec("599.99")).is_ok());
        assert!(validate_price(&dec("10.50")).is_ok());
        assert!(validate_price(&dec("99999999.99")).is_ok());
        assert!(validate_price(&dec("-1")).is_err());
        assert!(validate_price(&dec("1.999")).is_err());
        assert!(validate_price(&dec("100000000")).is_err());
    }

    #[test]
    fn create_request_defaults() {
        let from_string: CreateProductRequest =
            serde_json::from_str(r#"{"name":"Phone","price":"599.99","category":1}"#).unwrap();

        assert_eq!(from_string.price, dec("599.99"));
        assert!(from_string.is_active);
        assert_eq!(from_string.stock, 0);
        assert!(from_string.validate().is_ok());
    }

    #[test]
    fn update_request_validates_present_fields_only() {
        let empty = UpdateProductRequest::default();
        assert!(empty.validate().is_ok());

        let negative = UpdateProductRequest {
            stock: Some(-3),
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }
}
