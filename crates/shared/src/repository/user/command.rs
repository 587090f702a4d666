use crate::{
    abstract_trait::UserCommandRepositoryTrait,
    config::ConnectionPool,
    domain::{
        enums::UserType,
        requests::{CreateUserRecord, UpdateProfileRequest, UpdateUserRequest},
    },
    errors::RepositoryError,
    model::User as UserModel,
};
use async_trait::async_trait;
use tracing::{error, info};

pub struct UserCommandRepository {
    db: ConnectionPool,
}

impl UserCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserCommandRepositoryTrait for UserCommandRepository {
    async fn create_user(&self, req: &CreateUserRecord) -> Result<UserModel, RepositoryError> {
        let user = sqlx::query_as::<_, UserModel>(
            r#"
            INSERT INTO users (
                username,
                email,
                password,
                first_name,
                last_name,
                phone,
                address,
                user_type,
                is_staff
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&req.username)
        .bind(&req.email)
        .bind(&req.password_hash)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.phone)
        .bind(&req.address)
        .bind(req.user_type.as_str())
        .bind(req.user_type == UserType::Admin)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to create user {}: {:?}", req.username, e);
            RepositoryError::from(e)
        })?;

        info!("✅ Created user {} ({})", user.username, user.user_type);

        Ok(user)
    }

    async fn update_profile(
        &self,
        id: i32,
        req: &UpdateProfileRequest,
    ) -> Result<UserModel, RepositoryError> {
        sqlx::query_as::<_, UserModel>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.email)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.phone)
        .bind(&req.address)
        .fetch_optional(&self.db)
        .await
        .map_err(RepositoryError::from)?
        .ok_or(RepositoryError::NotFound)
    }

    async fn update_user(
        &self,
        id: i32,
        req: &UpdateUserRequest,
    ) -> Result<UserModel, RepositoryError> {
        sqlx::query_as::<_, UserModel>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                phone = COALESCE($6, phone),
                address = COALESCE($7, address),
                user_type = COALESCE($8, user_type),
                is_staff = COALESCE($8 = 'admin', is_staff),
                is_active = COALESCE($9, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.username)
        .bind(&req.email)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.phone)
        .bind(&req.address)
        .bind(req.user_type.map(|t| t.as_str()))
        .bind(req.is_active)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to update user {id}: {:?}", e);
            RepositoryError::from(e)
        })?
        .ok_or(RepositoryError::NotFound)
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET password = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.db)
            .await
            .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn touch_last_login(&self, id: i32) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE users SET last_login = CURRENT_TIMESTAMP WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn delete_user(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete user {id}: {:?}", e);
                RepositoryError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("🗑️ Deleted user {id}");

        Ok(())
    }
}
