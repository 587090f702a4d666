use crate::{
    abstract_trait::CategoryCommandRepositoryTrait,
    config::ConnectionPool,
    domain::requests::{CreateCategoryRequest, UpdateCategoryRequest},
    errors::RepositoryError,
    model::Category as CategoryModel,
};
use async_trait::async_trait;
use tracing::{error, info};

pub struct CategoryCommandRepository {
    db: ConnectionPool,
}

impl CategoryCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryCommandRepositoryTrait for CategoryCommandRepository {
    async fn create_category(
        &self,
        req: &CreateCategoryRequest,
    ) -> Result<CategoryModel, RepositoryError> {
        let category = sqlx::query_as::<_, CategoryModel>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, 0::BIGINT AS products_count, created_at, updated_at
            "#,
        )
        .bind(req.name.trim())
        .bind(&req.description)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to create category {}: {:?}", req.name, e);
            RepositoryError::from(e)
        })?;

        info!("✅ Created category {}", category.name);

        Ok(category)
    }

    async fn update_category(
        &self,
        id: i32,
        req: &UpdateCategoryRequest,
    ) -> Result<CategoryModel, RepositoryError> {
        sqlx::query_as::<_, CategoryModel>(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING
                id,
                name,
                description,
                (SELECT COUNT(*) FROM products p WHERE p.category_id = categories.id) AS products_count,
                created_at,
                updated_at
            "#,
        )
        .bind(id)
        .bind(req.name.as_deref().map(str::trim))
        .bind(&req.description)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to update category {id}: {:?}", e);
            RepositoryError::from(e)
        })?
        .ok_or(RepositoryError::NotFound)
    }

    /// Products in the category go with it.
    async fn delete_category(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("🗑️ Deleted category {id}");

        Ok(())
    }
}
