use crate::{
    abstract_trait::CategoryQueryRepositoryTrait,
    config::ConnectionPool,
    domain::requests::{FindAllCategories, PageRequest, SortOrder, like_pattern},
    errors::RepositoryError,
    model::Category as CategoryModel,
};
use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use tracing::{error, info};

/// Categories with their product count, aliased as `c`.
pub(crate) const CATEGORY_SOURCE: &str = r#"
    (SELECT
        cat.id,
        cat.name,
        cat.description,
        COUNT(p.id) AS products_count,
        cat.created_at,
        cat.updated_at
    FROM categories cat
    LEFT JOIN products p ON p.category_id = cat.id
    GROUP BY cat.id) c
"#;

const SORTABLE: [&str; 2] = ["name", "created_at"];

pub struct CategoryQueryRepository {
    db: ConnectionPool,
}

impl CategoryQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, req: &FindAllCategories) {
    if let Some(name) = req.name.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND c.name ILIKE ").push_bind(like_pattern(name));
    }

    if let Some(description) = req.description.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND c.description ILIKE ")
            .push_bind(like_pattern(description));
    }

    if let Some(search) = req.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = like_pattern(search);
        qb.push(" AND (c.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(after) = req.created_after {
        qb.push(" AND c.created_at >= ").push_bind(after);
    }

    if let Some(before) = req.created_before {
        qb.push(" AND c.created_at <= ").push_bind(before);
    }

    if let Some(min) = req.min_products {
        qb.push(" AND c.products_count >= ").push_bind(min);
    }

    if let Some(max) = req.max_products {
        qb.push(" AND c.products_count <= ").push_bind(max);
    }
}

#[async_trait]
impl CategoryQueryRepositoryTrait for CategoryQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllCategories,
    ) -> Result<(Vec<CategoryModel>, i64), RepositoryError> {
        info!("🔍 Fetching categories with search: {:?}", req.search);

        let page = PageRequest::new(req.page, req.page_size);
        let order = SortOrder::parse(req.ordering.as_deref(), &SORTABLE, SortOrder::asc("name"));

        let mut count =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {CATEGORY_SOURCE} WHERE TRUE"));
        push_filters(&mut count, req);

        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to count categories: {:?}", e);
                RepositoryError::from(e)
            })?;

        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT c.* FROM {CATEGORY_SOURCE} WHERE TRUE"));
        push_filters(&mut query, req);
        query
            .push(format!(
                " ORDER BY c.{} {}, c.id ASC LIMIT ",
                order.field,
                order.direction()
            ))
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let categories = query
            .build_query_as::<CategoryModel>()
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch categories: {:?}", e);
                RepositoryError::from(e)
            })?;

        Ok((categories, total))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<CategoryModel>, RepositoryError> {
        sqlx::query_as::<_, CategoryModel>(&format!(
            "SELECT c.* FROM {CATEGORY_SOURCE} WHERE c.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(RepositoryError::from)
    }
}
