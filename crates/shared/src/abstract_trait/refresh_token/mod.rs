use crate::{errors::RepositoryError, model::RefreshToken as RefreshTokenModel};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;

pub type DynRefreshTokenQueryRepository = Arc<dyn RefreshTokenQueryRepositoryTrait + Send + Sync>;

pub type DynRefreshTokenCommandRepository =
    Arc<dyn RefreshTokenCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait RefreshTokenQueryRepositoryTrait {
    async fn find_by_token(&self, token: &str)
    -> Result<Option<RefreshTokenModel>, RepositoryError>;
}

#[async_trait]
pub trait RefreshTokenCommandRepositoryTrait {
    async fn create(
        &self,
        user_id: i32,
        token: &str,
        expired_date: NaiveDateTime,
    ) -> Result<RefreshTokenModel, RepositoryError>;
    /// Returns whether a row was removed.
    async fn delete_token(&self, token: &str) -> Result<bool, RepositoryError>;
    async fn delete_by_user_id(&self, user_id: i32) -> Result<(), RepositoryError>;
}
