use crate::{
    abstract_trait::CartCommandRepositoryTrait, config::ConnectionPool, errors::RepositoryError,
    model::Cart as CartModel,
};
use async_trait::async_trait;
use tracing::{error, info};

pub struct CartCommandRepository {
    db: ConnectionPool,
}

impl CartCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartCommandRepositoryTrait for CartCommandRepository {
    async fn get_or_create(&self, user_id: i32) -> Result<CartModel, RepositoryError> {
        // The no-op update makes RETURNING yield the existing row too.
        sqlx::query_as::<_, CartModel>(
            r#"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to load cart for user {user_id}: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn save_item(
        &self,
        cart_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        sqlx::query(
            r#"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        sqlx::query("UPDATE carts SET updated_at = CURRENT_TIMESTAMP WHERE id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!("🛒 Cart {cart_id}: product {product_id} set to {quantity}");

        Ok(())
    }

    async fn update_item_quantity(
        &self,
        item_id: i32,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1",
        )
        .bind(item_id)
        .bind(quantity)
        .execute(&self.db)
        .await
        .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn remove_item(&self, item_id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.db)
            .await
            .map_err(RepositoryError::from)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn clear(&self, cart_id: i32) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&self.db)
            .await
            .map_err(RepositoryError::from)?;

        info!("🧹 Cleared cart {cart_id}");

        Ok(())
    }
}
