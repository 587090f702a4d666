use super::authenticated;
use crate::{
    middleware::{
        role::{require_admin, require_customer},
        validate::SimpleValidatedJson,
    },
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use shared::{
    abstract_trait::{DynOrderCommandService, DynOrderQueryService},
    domain::{
        requests::{CreateOrderRequest, FindAllOrders, UpdateOrderStatusRequest},
        responses::{ApiResponse, ApiResponsePagination, OrderResponse, Session},
    },
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/orders/create/",
    tag = "Order",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed from the cart", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Cart is empty or stock is insufficient"),
        (status = 403, description = "Customers only")
    )
)]
pub async fn create_order(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(session): Extension<Session>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_order(&session, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(FindAllOrders),
    responses(
        (status = 200, description = "The caller's orders", body = ApiResponsePagination<Vec<OrderResponse>>)
    )
)]
pub async fn get_my_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Extension(session): Extension<Session>,
    Query(params): Query<FindAllOrders>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_user(session.user_id, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_my_order(
    Extension(service): Extension<DynOrderQueryService>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id_for_user(id, session.user_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(FindAllOrders),
    responses(
        (status = 200, description = "All orders", body = ApiResponsePagination<Vec<OrderResponse>>),
        (status = 403, description = "Admins only")
    )
)]
pub async fn get_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Query(params): Query<FindAllOrders>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}/",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(service): Extension<DynOrderQueryService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status/",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order_status(
    Extension(service): Extension<DynOrderCommandService>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_status(id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn order_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let customer_routes = OpenApiRouter::new()
        .route("/api/orders/", get(get_my_orders))
        .route("/api/orders/create/", post(create_order))
        .route("/api/orders/{id}/", get(get_my_order))
        .route_layer(middleware::from_fn(require_customer));

    let admin_routes = OpenApiRouter::new()
        .route("/api/admin/orders/", get(get_orders))
        .route("/api/admin/orders/{id}/", get(get_order))
        .route("/api/admin/orders/{id}/status/", patch(update_order_status))
        .route_layer(middleware::from_fn(require_admin));

    authenticated(customer_routes.merge(admin_routes), &app_state)
        .layer(Extension(app_state.di_container.order_query.clone()))
        .layer(Extension(app_state.di_container.order_command.clone()))
}
