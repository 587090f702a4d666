use crate::{
    abstract_trait::RefreshTokenQueryRepositoryTrait, config::ConnectionPool,
    errors::RepositoryError, model::RefreshToken as RefreshTokenModel,
};
use async_trait::async_trait;

pub struct RefreshTokenQueryRepository {
    db: ConnectionPool,
}

impl RefreshTokenQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenQueryRepositoryTrait for RefreshTokenQueryRepository {
    /// Expired rows are treated as absent.
    async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenModel>, RepositoryError> {
        sqlx::query_as::<_, RefreshTokenModel>(
            r#"
            SELECT id, user_id, token, expired_date, created_at
            FROM refresh_tokens
            WHERE token = $1 AND expired_date > CURRENT_TIMESTAMP
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await
        .map_err(RepositoryError::from)
    }
}
