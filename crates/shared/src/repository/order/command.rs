use super::query::ORDER_SOURCE;
use crate::{
    abstract_trait::OrderCommandRepositoryTrait,
    config::ConnectionPool,
    domain::{enums::OrderStatus, requests::PlaceOrder},
    errors::RepositoryError,
    model::{Order as OrderModel, OrderStatusChange},
};
use async_trait::async_trait;
use tracing::{error, info, warn};

pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn place_order(&self, req: &PlaceOrder) -> Result<OrderModel, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(|e| {
            error!("❌ Failed to start order transaction: {:?}", e);
            RepositoryError::from(e)
        })?;

        let order_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (user_id, status, total_price, shipping_address)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(req.user_id)
        .bind(OrderStatus::Pending.as_str())
        .bind(req.total_price)
        .bind(req.shipping_address.trim())
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        for line in &req.lines {
            let taken = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - $1, updated_at = CURRENT_TIMESTAMP
                WHERE id = $2 AND stock >= $1
                "#,
            )
            .bind(line.quantity)
            .bind(line.product_id)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

            if taken.rows_affected() == 0 {
                warn!(
                    "⚠️ Stock for product {} ran out while placing order",
                    line.product_id
                );
                return Err(RepositoryError::Conflict(format!(
                    "Insufficient stock for {}",
                    line.product_name
                )));
            }

            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.price)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = ANY($2)")
            .bind(req.cart_id)
            .bind(req.product_ids())
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

        let order = sqlx::query_as::<_, OrderModel>(&format!(
            "SELECT o.* FROM {ORDER_SOURCE} WHERE o.id = $1"
        ))
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        tx.commit().await.map_err(|e| {
            error!("❌ Failed to commit order {order_id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        info!(
            "✅ Placed order {} for user {} ({} lines, total {})",
            order.id,
            order.user_id,
            req.lines.len(),
            order.total_price
        );

        Ok(order)
    }

    async fn update_status(
        &self,
        id: i32,
        status: OrderStatus,
    ) -> Result<OrderStatusChange, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(|e| {
            error!("❌ Failed to start status transaction for order {id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        let stored: String =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(RepositoryError::from)?
                .ok_or(RepositoryError::NotFound)?;

        let previous: OrderStatus = stored.parse().map_err(|e: String| {
            error!("❌ Order {id} holds an unreadable status: {e}");
            RepositoryError::Custom(e)
        })?;

        if !previous.can_transition_to(status) {
            return Err(RepositoryError::Conflict(format!(
                "Cannot change status from {previous} to {status}"
            )));
        }

        sqlx::query(
            r#"
            UPDATE orders
            SET status = $2, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        let order = sqlx::query_as::<_, OrderModel>(&format!(
            "SELECT o.* FROM {ORDER_SOURCE} WHERE o.id = $1"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

        tx.commit().await.map_err(|e| {
            error!("❌ Failed to commit status of order {id}: {:?}", e);
            RepositoryError::from(e)
        })?;

        info!("✅ Order {id} moved from {previous} to {status}");

        Ok(OrderStatusChange { order, previous })
    }
}
