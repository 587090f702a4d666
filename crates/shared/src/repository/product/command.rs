use crate::{
    abstract_trait::ProductCommandRepositoryTrait,
    config::ConnectionPool,
    domain::requests::{CreateProductRequest, UpdateProductRequest},
    errors::RepositoryError,
    model::Product as ProductModel,
};
use async_trait::async_trait;
use tracing::{error, info};

/// Re-reads a written row with its category name.
const RETURNING_PRODUCT: &str = r#"
    SELECT
        w.id,
        w.name,
        w.description,
        w.price,
        w.stock,
        w.category_id,
        cat.name AS category_name,
        w.is_active,
        w.created_at,
        w.updated_at
    FROM written w
    JOIN categories cat ON cat.id = w.category_id
"#;

pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let sql = format!(
            r#"
            WITH written AS (
                INSERT INTO products (name, description, price, stock, category_id, is_active)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            {RETURNING_PRODUCT}
            "#
        );

        let product = sqlx::query_as::<_, ProductModel>(&sql)
            .bind(req.name.trim())
            .bind(&req.description)
            .bind(req.price)
            .bind(req.stock)
            .bind(req.category)
            .bind(req.is_active)
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to create product {}: {:?}", req.name, e);
                RepositoryError::from(e)
            })?;

        info!("✅ Created product {} (id: {})", product.name, product.id);

        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        req: &UpdateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let sql = format!(
            r#"
            WITH written AS (
                UPDATE products
                SET name = COALESCE($2, name),
                    description = COALESCE($3, description),
                    price = COALESCE($4, price),
                    stock = COALESCE($5, stock),
                    category_id = COALESCE($6, category_id),
                    is_active = COALESCE($7, is_active),
                    updated_at = CURRENT_TIMESTAMP
                WHERE id = $1
                RETURNING *
            )
            {RETURNING_PRODUCT}
            "#
        );

        sqlx::query_as::<_, ProductModel>(&sql)
            .bind(id)
            .bind(req.name.as_deref().map(str::trim))
            .bind(&req.description)
            .bind(req.price)
            .bind(req.stock)
            .bind(req.category)
            .bind(req.is_active)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to update product {id}: {:?}", e);
                RepositoryError::from(e)
            })?
            .ok_or(RepositoryError::NotFound)
    }

    async fn update_stock(&self, id: i32, stock: i32) -> Result<ProductModel, RepositoryError> {
        let sql = format!(
            r#"
            WITH written AS (
                UPDATE products
                SET stock = $2, updated_at = CURRENT_TIMESTAMP
                WHERE id = $1
                RETURNING *
            )
            {RETURNING_PRODUCT}
            "#
        );

        sqlx::query_as::<_, ProductModel>(&sql)
            .bind(id)
            .bind(stock)
            .fetch_optional(&self.db)
            .await
            .map_err(RepositoryError::from)?
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete product {id}: {:?}", e);
                RepositoryError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("🗑️ Deleted product {id}");

        Ok(())
    }
}
