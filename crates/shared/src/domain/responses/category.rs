use crate::model::Category;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub products_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Category> for CategoryResponse {
    fn from(value: Category) -> Self {
        CategoryResponse {
            id: value.id,
            name: value.name,
            description: value.description,
            products_count: value.products_count,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
