use crate::{
    abstract_trait::OrderQueryRepositoryTrait,
    config::ConnectionPool,
    domain::requests::{FindAllOrders, PageRequest, SortOrder, like_pattern},
    errors::RepositoryError,
    model::{Order as OrderModel, OrderItem as OrderItemModel},
};
use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use tracing::{error, info};

/// Orders joined with their owner, aliased as `o`.
pub(crate) const ORDER_SOURCE: &str = r#"
    (SELECT
        ord.id,
        ord.user_id,
        u.username AS user_name,
        u.email AS user_email,
        ord.status,
        ord.total_price,
        ord.shipping_address,
        ord.created_at,
        ord.updated_at
    FROM orders ord
    JOIN users u ON u.id = ord.user_id) o
"#;

const SORTABLE: [&str; 3] = ["created_at", "total_price", "status"];

pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, req: &FindAllOrders, owner: Option<i32>) {
    if let Some(owner) = owner {
        qb.push(" AND o.user_id = ").push_bind(owner);
    } else if let Some(user) = req.user {
        qb.push(" AND o.user_id = ").push_bind(user);
    }

    if let Some(user_name) = req.user_name.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND o.user_name ILIKE ")
            .push_bind(like_pattern(user_name));
    }

    if let Some(status) = req.status {
        qb.push(" AND o.status = ").push_bind(status.as_str());
    }

    if let Some(min) = req.min_total {
        qb.push(" AND o.total_price >= ").push_bind(min);
    }

    if let Some(max) = req.max_total {
        qb.push(" AND o.total_price <= ").push_bind(max);
    }

    if let Some(after) = req.created_after {
        qb.push(" AND o.created_at >= ").push_bind(after);
    }

    if let Some(before) = req.created_before {
        qb.push(" AND o.created_at <= ").push_bind(before);
    }

    if let Some(search) = req.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = like_pattern(search);
        qb.push(" AND (o.user_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR o.user_email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR o.shipping_address ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllOrders,
        owner: Option<i32>,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        info!(
            "🔍 Fetching orders | owner: {:?}, search: {:?}",
            owner, req.search
        );

        let page = PageRequest::new(req.page, req.page_size);
        let order = SortOrder::parse(
            req.ordering.as_deref(),
            &SORTABLE,
            SortOrder::desc("created_at"),
        );

        let mut count =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {ORDER_SOURCE} WHERE TRUE"));
        push_filters(&mut count, req, owner);

        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to count orders: {:?}", e);
                RepositoryError::from(e)
            })?;

        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT o.* FROM {ORDER_SOURCE} WHERE TRUE"));
        push_filters(&mut query, req, owner);
        query
            .push(format!(
                " ORDER BY o.{} {}, o.id DESC LIMIT ",
                order.field,
                order.direction()
            ))
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let orders = query
            .build_query_as::<OrderModel>()
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch orders: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok((orders, total))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, RepositoryError> {
        sqlx::query_as::<_, OrderModel>(&format!(
            "SELECT o.* FROM {ORDER_SOURCE} WHERE o.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(RepositoryError::from)
    }

    async fn find_items(&self, order_ids: &[i32]) -> Result<Vec<OrderItemModel>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, OrderItemModel>(
            r#"
            SELECT
                oi.id,
                oi.order_id,
                oi.product_id,
                p.name AS product_name,
                oi.quantity,
                oi.price,
                oi.created_at
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.order_id, oi.id
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch order items: {:?}", e);
            RepositoryError::from(e)
        })
    }
}
