use super::{PublicCache, authenticated, cached_response};
use crate::{
    middleware::{role::require_admin, validate::SimpleValidatedJson},
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch},
};
use shared::{
    abstract_trait::{DynProductCommandService, DynProductQueryService},
    domain::{
        requests::{CreateProductRequest, FindAllProducts, UpdateProductRequest, UpdateStockRequest},
        responses::{ApiResponse, ApiResponsePagination, ProductListResponse, ProductResponse},
    },
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/products/",
    tag = "Product",
    params(FindAllProducts),
    responses(
        (status = 200, description = "Active products; X-Cache-Status tells whether the cache answered", body = ApiResponsePagination<Vec<ProductListResponse>>)
    )
)]
pub async fn get_public_products(
    Extension(service): Extension<DynProductQueryService>,
    Extension(policy): Extension<PublicCache>,
    Query(params): Query<FindAllProducts>,
) -> Result<impl IntoResponse, HttpError> {
    let lookup = service.find_public(&params).await?;
    Ok(cached_response(lookup, policy))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/",
    tag = "Product",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Active product details", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_public_product(
    Extension(service): Extension<DynProductQueryService>,
    Extension(policy): Extension<PublicCache>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let lookup = service.find_public_by_id(id).await?;
    Ok(cached_response(lookup, policy))
}

#[utoipa::path(
    get,
    path = "/api/admin/products/",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(FindAllProducts),
    responses(
        (status = 200, description = "All products", body = ApiResponsePagination<Vec<ProductListResponse>>),
        (status = 403, description = "Admins only")
    )
)]
pub async fn get_products(
    Extension(service): Extension<DynProductQueryService>,
    Query(params): Query<FindAllProducts>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/admin/products/{id}/",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    Extension(service): Extension<DynProductQueryService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/admin/products/",
    tag = "Product",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Validation error or unknown category")
    )
)]
pub async fn create_product(
    Extension(service): Extension<DynProductCommandService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateProductRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_product(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}/",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Validation error or unknown category"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    Extension(service): Extension<DynProductCommandService>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateProductRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_product(id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/products/{id}/stock/",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    request_body = UpdateStockRequest,
    responses(
        (status = 200, description = "Stock updated", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Stock must be zero or more"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_stock(
    Extension(service): Extension<DynProductCommandService>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateStockRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_stock(id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}/",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    Extension(service): Extension<DynProductCommandService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.delete_product(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn product_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public_routes = OpenApiRouter::new()
        .route("/api/products/", get(get_public_products))
        .route("/api/products/{id}/", get(get_public_product))
        .layer(Extension(PublicCache {
            max_age: app_state.public_max_age,
        }));

    let admin_routes = OpenApiRouter::new()
        .route(
            "/api/admin/products/",
            get(get_products).post(create_product),
        )
        .route(
            "/api/admin/products/{id}/",
            get(get_product)
                .put(update_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .route("/api/admin/products/{id}/stock/", patch(update_stock))
        .route_layer(middleware::from_fn(require_admin));

    public_routes
        .merge(authenticated(admin_routes, &app_state))
        .layer(Extension(app_state.di_container.product_query.clone()))
        .layer(Extension(app_state.di_container.product_command.clone()))
}
