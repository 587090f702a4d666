use crate::{
    abstract_trait::{CategoryCommandServiceTrait, DynCategoryCommandRepository},
    cache::CacheStore,
    domain::{
        requests::{CreateCategoryRequest, UpdateCategoryRequest},
        responses::{ApiResponse, CategoryResponse},
    },
    errors::{RepositoryError, ServiceError},
    utils::{Method, ServiceTracer},
};
use anyhow::Result;
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use tracing::info;

pub struct CategoryCommandServiceDeps {
    pub command: DynCategoryCommandRepository,
    pub cache: CacheStore,
}

#[derive(Clone)]
pub struct CategoryCommandService {
    command: DynCategoryCommandRepository,
    cache: CacheStore,
    tracer: ServiceTracer,
}

fn map_write_error(id: Option<i32>, err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::AlreadyExists(_) => ServiceError::Repo(RepositoryError::AlreadyExists(
            "Category with this name already exists".to_string(),
        )),
        RepositoryError::NotFound => ServiceError::not_found(match id {
            Some(id) => format!("Category with id {id} not found"),
            None => "Category not found".to_string(),
        }),
        other => ServiceError::Repo(other),
    }
}

impl CategoryCommandService {
    pub fn new(deps: CategoryCommandServiceDeps, registry: &mut Registry) -> Self {
        Self {
            command: deps.command,
            cache: deps.cache,
            tracer: ServiceTracer::new("category-command-service", registry),
        }
    }

    /// Product rows embed the category name, so both caches go.
    async fn invalidate(&self, category_id: i32) {
        self.cache.invalidate_categories(Some(category_id)).await;
        self.cache.invalidate_products(None).await;
    }
}

#[async_trait]
impl CategoryCommandServiceTrait for CategoryCommandService {
    async fn create_category(
        &self,
        req: &CreateCategoryRequest,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError> {
        info!("🏗️ Creating category: {}", req.name);

        let tracing_ctx = self.tracer.start(
            "category_create",
            vec![
                KeyValue::new("component", "category"),
                KeyValue::new("name", req.name.clone()),
            ],
        );

        let result = match self.command.create_category(req).await {
            Ok(category) => {
                self.invalidate(category.id).await;
                Ok(category)
            }
            Err(e) => Err(map_write_error(None, e)),
        };

        self.tracer
            .finish(&tracing_ctx, Method::Post, result, "Category created")
            .map(|category| {
                ApiResponse::success("Category created successfully", category.into())
            })
    }

    async fn update_category(
        &self,
        id: i32,
        req: &UpdateCategoryRequest,
    ) -> Result<ApiResponse<CategoryResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "category_update",
            vec![
                KeyValue::new("component", "category"),
                KeyValue::new("category_id", id.to_string()),
            ],
        );

        let result = match self.command.update_category(id, req).await {
            Ok(category) => {
                self.invalidate(id).await;
                Ok(category)
            }
            Err(e) => Err(map_write_error(Some(id), e)),
        };

        self.tracer
            .finish(&tracing_ctx, Method::Put, result, "Category updated")
            .map(|category| {
                ApiResponse::success("Category updated successfully", category.into())
            })
    }

    async fn delete_category(&self, id: i32) -> Result<ApiResponse<()>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "category_delete",
            vec![
                KeyValue::new("component", "category"),
                KeyValue::new("category_id", id.to_string()),
            ],
        );

        let result = match self.command.delete_category(id).await {
            Ok(()) => {
                self.invalidate(id).await;
                Ok(())
            }
            Err(e) => Err(map_write_error(Some(id), e)),
        };

        self.tracer
            .finish(&tracing_ctx, Method::Delete, result, "Category deleted")
            .map(|_| ApiResponse::success("Category deleted successfully", ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::CacheKey,
        service::fakes::{FakeStore, memory_cache},
    };
    use chrono::Duration;

    fn service(store: &std::sync::Arc<FakeStore>, cache: CacheStore) -> CategoryCommandService {
        let mut registry = Registry::default();
        CategoryCommandService::new(
            CategoryCommandServiceDeps {
                command: store.clone(),
                cache,
            },
            &mut registry,
        )
    }

    #[tokio::test]
    async fn duplicate_name_is_a_conflict() {
        let store = FakeStore::new();
        let categories = service(&store, memory_cache());
        let req = CreateCategoryRequest {
            name: "Books".into(),
            description: String::new(),
        };

        categories.create_category(&req).await.unwrap();

        match categories.create_category(&req).await {
            Err(ServiceError::Repo(RepositoryError::AlreadyExists(msg))) => {
                assert_eq!(msg, "Category with this name already exists");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn writes_invalidate_category_and_product_lists() {
        let store = FakeStore::new();
        let cache = memory_cache();
        let categories = service(&store, cache.clone());
        let books = store.insert_category("Books");

        cache
            .set_to_cache("public_categories:list:{}", &1, Duration::minutes(5))
            .await;
        cache
            .set_to_cache("public_products:list:{}", &1, Duration::minutes(5))
            .await;
        cache
            .set_to_cache(&CacheKey::category_detail(books.id), &1, Duration::minutes(5))
            .await;

        let renamed = categories
            .update_category(
                books.id,
                &UpdateCategoryRequest {
                    name: Some("Novels".into()),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.data.name, "Novels");

        assert!(cache.get_from_cache::<i32>("public_categories:list:{}").await.is_none());
        assert!(cache.get_from_cache::<i32>("public_products:list:{}").await.is_none());
        assert!(
            cache
                .get_from_cache::<i32>(&CacheKey::category_detail(books.id))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn deleting_unknown_category_is_not_found() {
        let store = FakeStore::new();
        let categories = service(&store, memory_cache());

        assert!(matches!(
            categories.delete_category(7).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
