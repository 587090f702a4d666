use super::with_items;
use crate::{
    abstract_trait::{DynOrderQueryRepository, OrderQueryServiceTrait},
    domain::{
        requests::{FindAllOrders, PageRequest},
        responses::{ApiResponse, ApiResponsePagination, OrderResponse, Pagination},
    },
    errors::ServiceError,
    utils::{Method, ServiceTracer},
};
use anyhow::Result;
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use tracing::info;

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    tracer: ServiceTracer,
}

impl OrderQueryService {
    pub fn new(query: DynOrderQueryRepository, registry: &mut Registry) -> Self {
        Self {
            query,
            tracer: ServiceTracer::new("order-query-service", registry),
        }
    }

    async fn page(
        &self,
        req: &FindAllOrders,
        owner: Option<i32>,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError> {
        let page = PageRequest::new(req.page, req.page_size);
        let (orders, total) = self.query.find_all(req, owner).await?;
        let data = with_items(&self.query, orders).await?;

        info!("✅ Found {} orders (total: {total})", data.len());

        Ok(ApiResponsePagination::success(
            "Orders retrieved successfully",
            data,
            Pagination::new(&page, total),
        ))
    }

    async fn one(&self, id: i32, owner: Option<i32>) -> Result<OrderResponse, ServiceError> {
        let order = self
            .query
            .find_by_id(id)
            .await?
            .filter(|order| owner.is_none_or(|user_id| order.user_id == user_id))
            .ok_or_else(|| ServiceError::not_found(format!("Order with id {id} not found")))?;

        let mut responses = with_items(&self.query, vec![order]).await?;
        responses
            .pop()
            .ok_or_else(|| ServiceError::Internal("Order vanished while loading".to_string()))
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_all(
        &self,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "order_find_all",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("search", req.search.clone().unwrap_or_default()),
            ],
        );

        let result = self.page(req, None).await;
        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "Orders retrieved")
    }

    async fn find_by_user(
        &self,
        user_id: i32,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "order_find_by_user",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("user_id", user_id.to_string()),
            ],
        );

        let result = self.page(req, Some(user_id)).await;
        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "User orders retrieved")
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "order_find_by_id",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order_id", id.to_string()),
            ],
        );

        let result = self.one(id, None).await;
        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "Order retrieved")
            .map(|order| ApiResponse::success("Order retrieved successfully", order))
    }

    async fn find_by_id_for_user(
        &self,
        id: i32,
        user_id: i32,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "order_find_by_id_for_user",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order_id", id.to_string()),
                KeyValue::new("user_id", user_id.to_string()),
            ],
        );

        let result = self.one(id, Some(user_id)).await;
        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "Order retrieved")
            .map(|order| ApiResponse::success("Order retrieved successfully", order))
    }
}
