use crate::{
    abstract_trait::ProductQueryRepositoryTrait,
    config::ConnectionPool,
    domain::requests::{FindAllProducts, PageRequest, SortOrder, like_pattern},
    errors::RepositoryError,
    model::Product as ProductModel,
};
use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use tracing::{error, info};

/// Products joined with their category name, aliased as `p`.
pub(crate) const PRODUCT_SOURCE: &str = r#"
    (SELECT
        prod.id,
        prod.name,
        prod.description,
        prod.price,
        prod.stock,
        prod.category_id,
        cat.name AS category_name,
        prod.is_active,
        prod.created_at,
        prod.updated_at
    FROM products prod
    JOIN categories cat ON cat.id = prod.category_id) p
"#;

const SORTABLE: [&str; 4] = ["name", "price", "stock", "created_at"];

pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, req: &FindAllProducts, active_only: bool) {
    if active_only {
        qb.push(" AND p.is_active = TRUE");
    } else if let Some(is_active) = req.is_active {
        qb.push(" AND p.is_active = ").push_bind(is_active);
    }

    if let Some(name) = non_blank(&req.name) {
        qb.push(" AND p.name ILIKE ").push_bind(like_pattern(name));
    }

    if let Some(description) = non_blank(&req.description) {
        qb.push(" AND p.description ILIKE ")
            .push_bind(like_pattern(description));
    }

    if let Some(category) = req.category {
        qb.push(" AND p.category_id = ").push_bind(category);
    }

    if let Some(category_name) = non_blank(&req.category_name) {
        qb.push(" AND p.category_name ILIKE ")
            .push_bind(like_pattern(category_name));
    }

    if let Some(min) = req.min_price {
        qb.push(" AND p.price >= ").push_bind(min);
    }

    if let Some(max) = req.max_price {
        qb.push(" AND p.price <= ").push_bind(max);
    }

    if let Some(min) = req.min_stock {
        qb.push(" AND p.stock >= ").push_bind(min);
    }

    if let Some(max) = req.max_stock {
        qb.push(" AND p.stock <= ").push_bind(max);
    }

    // Only `true` narrows; sold-out rows come from `out_of_stock`.
    if req.in_stock == Some(true) {
        qb.push(" AND p.stock > 0");
    }

    if req.out_of_stock == Some(true) {
        qb.push(" AND p.stock = 0");
    }

    if let Some(after) = req.created_after {
        qb.push(" AND p.created_at >= ").push_bind(after);
    }

    if let Some(before) = req.created_before {
        qb.push(" AND p.created_at <= ").push_bind(before);
    }

    if let Some(search) = non_blank(&req.search) {
        let pattern = like_pattern(search);
        qb.push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.category_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllProducts,
        active_only: bool,
    ) -> Result<(Vec<ProductModel>, i64), RepositoryError> {
        info!(
            "🔍 Fetching products | search: {:?}, active_only: {active_only}",
            req.search
        );

        let page = PageRequest::new(req.page, req.page_size);
        let order = SortOrder::parse(
            req.ordering.as_deref(),
            &SORTABLE,
            SortOrder::desc("created_at"),
        );

        let mut count =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {PRODUCT_SOURCE} WHERE TRUE"));
        push_filters(&mut count, req, active_only);

        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to count products: {:?}", e);
                RepositoryError::from(e)
            })?;

        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT p.* FROM {PRODUCT_SOURCE} WHERE TRUE"));
        push_filters(&mut query, req, active_only);
        query
            .push(format!(
                " ORDER BY p.{} {}, p.id DESC LIMIT ",
                order.field,
                order.direction()
            ))
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let products = query
            .build_query_as::<ProductModel>()
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch products: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok((products, total))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError> {
        sqlx::query_as::<_, ProductModel>(&format!(
            "SELECT p.* FROM {PRODUCT_SOURCE} WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(RepositoryError::from)
    }
}
