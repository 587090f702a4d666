use crate::domain::responses::{ProfileResponse, UserResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AdminDashboardResponse {
    pub dashboard_type: String,
    pub total_users: i64,
    pub admin_users: i64,
    pub customer_users: i64,
    pub recent_users: Vec<UserResponse>,
    pub user_info: ProfileResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CustomerDashboardResponse {
    pub dashboard_type: String,
    pub message: String,
    pub user_info: ProfileResponse,
}
