use crate::{
    abstract_trait::{
        DynCategoryQueryRepository, DynProductCommandRepository, ProductCommandServiceTrait,
    },
    cache::CacheStore,
    domain::{
        requests::{CreateProductRequest, UpdateProductRequest, UpdateStockRequest},
        responses::{ApiResponse, ProductResponse},
    },
    errors::{RepositoryError, ServiceError},
    utils::{Method, ServiceTracer},
};
use anyhow::Result;
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use tracing::{error, info};

pub struct ProductCommandServiceDeps {
    pub command: DynProductCommandRepository,
    pub category_query: DynCategoryQueryRepository,
    pub cache: CacheStore,
}

#[derive(Clone)]
pub struct ProductCommandService {
    command: DynProductCommandRepository,
    category_query: DynCategoryQueryRepository,
    cache: CacheStore,
    tracer: ServiceTracer,
}

impl ProductCommandService {
    pub fn new(deps: ProductCommandServiceDeps, registry: &mut Registry) -> Self {
        Self {
            command: deps.command,
            category_query: deps.category_query,
            cache: deps.cache,
            tracer: ServiceTracer::new("product-command-service", registry),
        }
    }

    async fn ensure_category(&self, category_id: i32) -> Result<(), ServiceError> {
        match self.category_query.find_by_id(category_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::validation(format!(
                "Category with id {category_id} does not exist"
            ))),
        }
    }

    fn map_write_error(id: i32, err: RepositoryError) -> ServiceError {
        match err {
            RepositoryError::NotFound => {
                ServiceError::not_found(format!("Product with id {id} not found"))
            }
            RepositoryError::ForeignKey(_) => {
                ServiceError::validation("Category does not exist")
            }
            other => ServiceError::Repo(other),
        }
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🏗️ Creating product: {}", req.name);

        let tracing_ctx = self.tracer.start(
            "product_create",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("name", req.name.clone()),
            ],
        );

        if let Err(e) = self.ensure_category(req.category).await {
            self.tracer
                .complete_error(&tracing_ctx, Method::Post, &e.to_string());
            return Err(e);
        }

        let product = match self.command.create_product(req).await {
            Ok(product) => product,
            Err(e) => {
                error!("❌ Failed to create product '{}': {e:?}", req.name);
                let err = Self::map_write_error(0, e);
                self.tracer
                    .complete_error(&tracing_ctx, Method::Post, &err.to_string());
                return Err(err);
            }
        };

        self.cache.invalidate_products(Some(product.id)).await;
        self.cache.invalidate_categories(None).await;

        info!("✅ Product created: {} (id: {})", product.name, product.id);
        self.tracer
            .complete_success(&tracing_ctx, Method::Post, "Product created");

        Ok(ApiResponse::success(
            "Product created successfully",
            ProductResponse::from(product),
        ))
    }

    async fn update_product(
        &self,
        id: i32,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "product_update",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product_id", id.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            if let Some(category_id) = req.category {
                self.ensure_category(category_id).await?;
            }

            let product = self
                .command
                .update_product(id, req)
                .await
                .map_err(|e| Self::map_write_error(id, e))?;

            self.cache.invalidate_products(Some(id)).await;
            if req.category.is_some() {
                self.cache.invalidate_categories(None).await;
            }

            Ok(product)
        }
        .await;

        self.tracer
            .finish(&tracing_ctx, Method::Put, result, "Product updated")
            .map(|product| ApiResponse::success("Product updated successfully", product.into()))
    }

    async fn update_stock(
        &self,
        id: i32,
        req: &UpdateStockRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("📦 Setting stock of product {id} to {}", req.stock);

        let tracing_ctx = self.tracer.start(
            "product_update_stock",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product_id", id.to_string()),
                KeyValue::new("stock", req.stock.to_string()),
            ],
        );

        let result = match self.command.update_stock(id, req.stock).await {
            Ok(product) => {
                self.cache.invalidate_products(Some(id)).await;
                Ok(product)
            }
            Err(e) => Err(Self::map_write_error(id, e)),
        };

        self.tracer
            .finish(&tracing_ctx, Method::Patch, result, "Stock updated")
            .map(|product| ApiResponse::success("Stock updated successfully", product.into()))
    }

    async fn delete_product(&self, id: i32) -> Result<ApiResponse<()>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "product_delete",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product_id", id.to_string()),
            ],
        );

        let result = match self.command.delete_product(id).await {
            Ok(()) => {
                self.cache.invalidate_products(Some(id)).await;
                self.cache.invalidate_categories(None).await;
                Ok(())
            }
            Err(e) => Err(Self::map_write_error(id, e)),
        };

        self.tracer
            .finish(&tracing_ctx, Method::Delete, result, "Product deleted")
            .map(|_| ApiResponse::success("Product deleted successfully", ()))
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
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn service(store: &Arc<FakeStore>, cache: CacheStore) -> ProductCommandService {
        let mut registry = Registry::default();
        ProductCommandService::new(
            ProductCommandServiceDeps {
                command: store.clone(),
                category_query: store.clone(),
                cache,
            },
            &mut registry,
        )
    }

    fn create_request(category: i32) -> CreateProductRequest {
        CreateProductRequest {
            name: "Pixel".into(),
            description: String::new(),
            price: Decimal::new(59_999, 2),
            stock: 3,
            category,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn unknown_category_is_a_bad_request() {
        let store = FakeStore::new();
        let products = service(&store, memory_cache());

        assert!(matches!(
            products.create_product(&create_request(99)).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn create_invalidates_product_and_category_lists() {
        let store = FakeStore::new();
        let cache = memory_cache();
        let products = service(&store, cache.clone());
        let phones = store.insert_category("Phones");

        cache
            .set_to_cache("public_products:list:{}", &1, Duration::minutes(5))
            .await;
        cache
            .set_to_cache("public_categories:list:{}", &1, Duration::minutes(5))
            .await;

        let created = products.create_product(&create_request(phones.id)).await.unwrap();
        assert_eq!(created.data.category_name, "Phones");
        assert!(created.data.in_stock);

        assert!(cache.get_from_cache::<i32>("public_products:list:{}").await.is_none());
        assert!(cache.get_from_cache::<i32>("public_categories:list:{}").await.is_none());
    }

    #[tokio::test]
    async fn stock_update_drops_cached_detail() {
        let store = FakeStore::new();
        let cache = memory_cache();
        let products = service(&store, cache.clone());
        let phones = store.insert_category("Phones");
        let pixel = store.insert_product("Pixel", Decimal::ONE, 3, phones.id);
        let key = CacheKey::product_detail(pixel.id);

        cache.set_to_cache(&key, &"stale", Duration::minutes(5)).await;

        let updated = products
            .update_stock(pixel.id, &UpdateStockRequest { stock: 0 })
            .await
            .unwrap();

        assert_eq!(updated.data.stock, 0);
        assert!(!updated.data.in_stock);
        assert!(cache.get_from_cache::<String>(&key).await.is_none());
    }

    #[tokio::test]
    async fn missing_product_is_not_found() {
        let store = FakeStore::new();
        let products = service(&store, memory_cache());

        assert!(matches!(
            products.delete_product(5).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            products
                .update_product(5, &UpdateProductRequest::default())
                .await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
