use crate::{
    abstract_trait::UserQueryRepositoryTrait,
    config::ConnectionPool,
    domain::requests::{FindAllUsers, PageRequest, like_pattern},
    errors::RepositoryError,
    model::{User as UserModel, UserCounts},
};
use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use tracing::{error, info};

pub struct UserQueryRepository {
    db: ConnectionPool,
}

impl UserQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, req: &FindAllUsers) {
    if let Some(search) = req.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = like_pattern(search);
        qb.push(" AND (u.username ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(user_type) = req.user_type {
        qb.push(" AND u.user_type = ").push_bind(user_type.as_str());
    }
}

#[async_trait]
impl UserQueryRepositoryTrait for UserQueryRepository {
    async fn find_all(&self, req: &FindAllUsers) -> Result<(Vec<UserModel>, i64), RepositoryError> {
        info!("🔍 Fetching users with search: {:?}", req.search);

        let page = PageRequest::new(req.page, req.page_size);

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users u WHERE TRUE");
        push_filters(&mut count, req);

        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to count users: {:?}", e);
                RepositoryError::from(e)
            })?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT u.* FROM users u WHERE TRUE");
        push_filters(&mut query, req);
        query
            .push(" ORDER BY u.date_joined DESC, u.id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let users = query
            .build_query_as::<UserModel>()
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch users: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok((users, total))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<UserModel>, RepositoryError> {
        sqlx::query_as::<_, UserModel>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(RepositoryError::from)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserModel>, RepositoryError> {
        sqlx::query_as::<_, UserModel>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await
            .map_err(RepositoryError::from)
    }

    async fn count_by_type(&self) -> Result<UserCounts, RepositoryError> {
        sqlx::query_as::<_, UserCounts>(
            r#"
            SELECT
                COUNT(*) AS total_users,
                COUNT(*) FILTER (WHERE user_type = 'admin') AS admin_users,
                COUNT(*) FILTER (WHERE user_type = 'customer') AS customer_users
            FROM users
            "#,
        )
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to count users by type: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn find_recent(&self, limit: i64) -> Result<Vec<UserModel>, RepositoryError> {
        sqlx::query_as::<_, UserModel>(
            "SELECT * FROM users ORDER BY date_joined DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .map_err(RepositoryError::from)
    }
}
