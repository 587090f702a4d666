use crate::{
    domain::requests::FindAllUsers,
    errors::RepositoryError,
    model::{User as UserModel, UserCounts},
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type DynUserQueryRepository = Arc<dyn UserQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait UserQueryRepositoryTrait {
    async fn find_all(&self, req: &FindAllUsers) -> Result<(Vec<UserModel>, i64), RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<UserModel>, RepositoryError>;
    async fn find_by_username(&self, username: &str)
    -> Result<Option<UserModel>, RepositoryError>;
    async fn count_by_type(&self) -> Result<UserCounts, RepositoryError>;
    async fn find_recent(&self, limit: i64) -> Result<Vec<UserModel>, RepositoryError>;
}
