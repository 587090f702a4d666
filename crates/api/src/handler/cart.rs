use super::authenticated;
use crate::{
    middleware::{role::require_customer, validate::SimpleValidatedJson},
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use shared::{
    abstract_trait::DynCartService,
    domain::{
        requests::{AddToCartRequest, UpdateCartItemRequest},
        responses::{ApiResponse, CartResponse, Session},
    },
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/cart/",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current cart with totals", body = ApiResponse<CartResponse>),
        (status = 403, description = "Customers only")
    )
)]
pub async fn get_cart(
    Extension(service): Extension<DynCartService>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.get_cart(session.user_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/cart/add/",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added", body = ApiResponse<CartResponse>),
        (status = 400, description = "Not enough stock"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn add_to_cart(
    Extension(service): Extension<DynCartService>,
    Extension(session): Extension<Session>,
    SimpleValidatedJson(body): SimpleValidatedJson<AddToCartRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.add_item(session.user_id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/api/cart/items/{id}/",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Cart item ID")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity updated", body = ApiResponse<CartResponse>),
        (status = 400, description = "Not enough stock"),
        (status = 404, description = "Cart item not found")
    )
)]
pub async fn update_cart_item(
    Extension(service): Extension<DynCartService>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateCartItemRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_item(session.user_id, id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{id}/remove/",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Cart item ID")),
    responses(
        (status = 200, description = "Item removed", body = ApiResponse<CartResponse>),
        (status = 404, description = "Cart item not found")
    )
)]
pub async fn remove_cart_item(
    Extension(service): Extension<DynCartService>,
    Extension(session): Extension<Session>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.remove_item(session.user_id, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/cart/clear/",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<CartResponse>)
    )
)]
pub async fn clear_cart(
    Extension(service): Extension<DynCartService>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.clear_cart(session.user_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn cart_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let routes = OpenApiRouter::new()
        .route("/api/cart/", get(get_cart))
        .route("/api/cart/add/", post(add_to_cart))
        .route("/api/cart/items/{id}/", patch(update_cart_item))
        .route("/api/cart/items/{id}/remove/", delete(remove_cart_item))
        .route("/api/cart/clear/", delete(clear_cart))
        .route_layer(middleware::from_fn(require_customer));

    authenticated(routes, &app_state).layer(Extension(app_state.di_container.cart_service.clone()))
}
