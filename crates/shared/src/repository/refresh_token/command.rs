use crate::{
    abstract_trait::RefreshTokenCommandRepositoryTrait, config::ConnectionPool,
    errors::RepositoryError, model::RefreshToken as RefreshTokenModel,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::error;

pub struct RefreshTokenCommandRepository {
    db: ConnectionPool,
}

impl RefreshTokenCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenCommandRepositoryTrait for RefreshTokenCommandRepository {
    async fn create(
        &self,
        user_id: i32,
        token: &str,
        expired_date: NaiveDateTime,
    ) -> Result<RefreshTokenModel, RepositoryError> {
        sqlx::query_as::<_, RefreshTokenModel>(
            r#"
            INSERT INTO refresh_tokens (user_id, token, expired_date)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, token, expired_date, created_at
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expired_date)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to store refresh token for user {user_id}: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn delete_token(&self, token: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.db)
            .await
            .map_err(RepositoryError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_user_id(&self, user_id: i32) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(RepositoryError::from)?;

        Ok(())
    }
}
