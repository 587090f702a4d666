use crate::{
    domain::{
        requests::{LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest},
        responses::{ApiResponse, LoginResponse, RefreshResponse, UserResponse},
    },
    errors::ServiceError,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynAuthService = Arc<dyn AuthServiceTrait + Send + Sync>;

#[async_trait]
pub trait AuthServiceTrait {
    async fn register(
        &self,
        req: &RegisterRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError>;
    async fn login(&self, req: &LoginRequest) -> Result<ApiResponse<LoginResponse>, ServiceError>;
    async fn refresh_token(
        &self,
        req: &RefreshTokenRequest,
    ) -> Result<ApiResponse<RefreshResponse>, ServiceError>;
    async fn logout(&self, user_id: i32, req: &LogoutRequest)
    -> Result<ApiResponse<()>, ServiceError>;
}
