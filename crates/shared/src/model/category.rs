use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub products_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
