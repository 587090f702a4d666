use crate::{
    abstract_trait::CartQueryRepositoryTrait,
    config::ConnectionPool,
    errors::RepositoryError,
    model::{Cart as CartModel, CartItem as CartItemModel},
};
use async_trait::async_trait;

const CART_ITEM_SELECT: &str = r#"
    SELECT
        ci.id,
        ci.cart_id,
        ci.product_id,
        p.name AS product_name,
        p.price AS product_price,
        p.stock AS product_stock,
        p.is_active AS product_is_active,
        ci.quantity,
        ci.created_at,
        ci.updated_at
    FROM cart_items ci
    JOIN products p ON p.id = ci.product_id
"#;

pub struct CartQueryRepository {
    db: ConnectionPool,
}

impl CartQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartQueryRepositoryTrait for CartQueryRepository {
    async fn find_by_user(&self, user_id: i32) -> Result<Option<CartModel>, RepositoryError> {
        sqlx::query_as::<_, CartModel>("SELECT * FROM carts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .map_err(RepositoryError::from)
    }

    async fn find_items(&self, cart_id: i32) -> Result<Vec<CartItemModel>, RepositoryError> {
        sqlx::query_as::<_, CartItemModel>(&format!(
            "{CART_ITEM_SELECT} WHERE ci.cart_id = $1 ORDER BY ci.created_at, ci.id"
        ))
        .bind(cart_id)
        .fetch_all(&self.db)
        .await
        .map_err(RepositoryError::from)
    }

    async fn find_item_by_product(
        &self,
        cart_id: i32,
        product_id: i32,
    ) -> Result<Option<CartItemModel>, RepositoryError> {
        sqlx::query_as::<_, CartItemModel>(&format!(
            "{CART_ITEM_SELECT} WHERE ci.cart_id = $1 AND ci.product_id = $2"
        ))
        .bind(cart_id)
        .bind(product_id)
        .fetch_optional(&self.db)
        .await
        .map_err(RepositoryError::from)
    }

    async fn find_item_by_id(
        &self,
        cart_id: i32,
        item_id: i32,
    ) -> Result<Option<CartItemModel>, RepositoryError> {
        sqlx::query_as::<_, CartItemModel>(&format!(
            "{CART_ITEM_SELECT} WHERE ci.cart_id = $1 AND ci.id = $2"
        ))
        .bind(cart_id)
        .bind(item_id)
        .fetch_optional(&self.db)
        .await
        .map_err(RepositoryError::from)
    }
}
