use crate::utils::deserialize_optional_datetime;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindAllCategories {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Name contains (case-insensitive).
    pub name: Option<String>,
    pub description: Option<String>,
    /// Matches name or description.
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub created_after: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub created_before: Option<NaiveDateTime>,
    pub min_products: Option<i64>,
    pub max_products: Option<i64>,
    /// `name`, `created_at`; prefix with `-` for descending.
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Electronics")]
    pub name: String,

    #[serde(default)]
    #[schema(example = "Phones, laptops and accessories")]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,
}
