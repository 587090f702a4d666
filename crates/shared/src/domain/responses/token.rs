use crate::domain::responses::UserResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct LoginResponse {
    pub refresh: String,
    pub access: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RefreshResponse {
    pub access: String,
}
