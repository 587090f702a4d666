use crate::{
    domain::{
        requests::{
            ChangePasswordRequest, CreateAdminRequest, FindAllUsers, UpdateProfileRequest,
            UpdateUserRequest,
        },
        responses::{
            AdminDashboardResponse, ApiResponse, ApiResponsePagination,
            CustomerDashboardResponse, ProfileResponse, ProfileStatsResponse, Session,
            UserResponse,
        },
    },
    errors::ServiceError,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynUserService = Arc<dyn UserServiceTrait + Send + Sync>;
pub type DynProfileService = Arc<dyn ProfileServiceTrait + Send + Sync>;
pub type DynDashboardService = Arc<dyn DashboardServiceTrait + Send + Sync>;

/// User management for administrators.
#[async_trait]
pub trait UserServiceTrait {
    async fn find_all(
        &self,
        req: &FindAllUsers,
    ) -> Result<ApiResponsePagination<Vec<UserResponse>>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<UserResponse>, ServiceError>;
    async fn create_admin(
        &self,
        req: &CreateAdminRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError>;
    async fn update_user(
        &self,
        id: i32,
        req: &UpdateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError>;
    async fn delete_user(&self, id: i32) -> Result<ApiResponse<()>, ServiceError>;
}

/// The signed-in user's own account.
#[async_trait]
pub trait ProfileServiceTrait {
    async fn session(&self, user_id: i32) -> Result<Session, ServiceError>;
    async fn get_profile(&self, user_id: i32)
    -> Result<ApiResponse<ProfileResponse>, ServiceError>;
    async fn update_profile(
        &self,
        user_id: i32,
        req: &UpdateProfileRequest,
    ) -> Result<ApiResponse<ProfileResponse>, ServiceError>;
    async fn change_password(
        &self,
        user_id: i32,
        req: &ChangePasswordRequest,
    ) -> Result<ApiResponse<()>, ServiceError>;
    async fn profile_stats(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<ProfileStatsResponse>, ServiceError>;
}

#[async_trait]
pub trait DashboardServiceTrait {
    async fn admin_dashboard(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<AdminDashboardResponse>, ServiceError>;
    async fn customer_dashboard(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<CustomerDashboardResponse>, ServiceError>;
}
