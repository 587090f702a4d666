use crate::{
    domain::requests::{CreateUserRecord, UpdateProfileRequest, UpdateUserRequest},
    errors::RepositoryError,
    model::User as UserModel,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynUserCommandRepository = Arc<dyn UserCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait UserCommandRepositoryTrait {
    async fn create_user(&self, req: &CreateUserRecord) -> Result<UserModel, RepositoryError>;
    async fn update_profile(
        &self,
        id: i32,
        req: &UpdateProfileRequest,
    ) -> Result<UserModel, RepositoryError>;
    async fn update_user(
        &self,
        id: i32,
        req: &UpdateUserRequest,
    ) -> Result<UserModel, RepositoryError>;
    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), RepositoryError>;
    async fn touch_last_login(&self, id: i32) -> Result<(), RepositoryError>;
    async fn delete_user(&self, id: i32) -> Result<(), RepositoryError>;
}
