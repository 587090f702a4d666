use super::authenticated;
use crate::{middleware::role::require_admin, state::AppState};
use axum::{
    Extension, Json,
    body::Bytes,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::{
    abstract_trait::DynCacheAdminService,
    domain::{
        requests::InvalidateCacheRequest,
        responses::{ApiResponse, CacheStatsResponse},
    },
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;
use validator::Validate;

/// The invalidation bodies are optional; an empty body targets everything.
fn parse_invalidation(body: &Bytes) -> Result<InvalidateCacheRequest, HttpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(InvalidateCacheRequest::default());
    }

    let request: InvalidateCacheRequest = serde_json::from_slice(body)
        .map_err(|e| HttpError::BadRequest(format!("Invalid JSON: {e}")))?;

    request
        .validate()
        .map_err(|e| HttpError::BadRequest(format!("Validation failed: {e}")))?;

    Ok(request)
}

#[utoipa::path(
    get,
    path = "/api/admin/cache/stats/",
    tag = "Cache",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Backend name, TTL and backend statistics", body = ApiResponse<CacheStatsResponse>),
        (status = 403, description = "Admins only")
    )
)]
pub async fn cache_stats(
    Extension(service): Extension<DynCacheAdminService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.stats().await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/admin/cache/clear/",
    tag = "Cache",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cache cleared"),
        (status = 403, description = "Admins only")
    )
)]
pub async fn clear_cache(
    Extension(service): Extension<DynCacheAdminService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.clear_all().await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/admin/cache/invalidate-products/",
    tag = "Cache",
    security(("bearer_auth" = [])),
    request_body(content = InvalidateCacheRequest, description = "Optional `product_id`"),
    responses(
        (status = 200, description = "Product cache invalidated"),
        (status = 403, description = "Admins only")
    )
)]
pub async fn invalidate_products(
    Extension(service): Extension<DynCacheAdminService>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let request = parse_invalidation(&body)?;
    let response = service.invalidate_products(request.id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/admin/cache/invalidate-categories/",
    tag = "Cache",
    security(("bearer_auth" = [])),
    request_body(content = InvalidateCacheRequest, description = "Optional `category_id`"),
    responses(
        (status = 200, description = "Category cache invalidated"),
        (status = 403, description = "Admins only")
    )
)]
pub async fn invalidate_categories(
    Extension(service): Extension<DynCacheAdminService>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let request = parse_invalidation(&body)?;
    let response = service.invalidate_categories(request.id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn cache_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let routes = OpenApiRouter::new()
        .route("/api/admin/cache/stats/", get(cache_stats))
        .route("/api/admin/cache/clear/", post(clear_cache))
        .route(
            "/api/admin/cache/invalidate-products/",
            post(invalidate_products),
        )
        .route(
            "/api/admin/cache/invalidate-categories/",
            post(invalidate_categories),
        )
        .route_layer(middleware::from_fn(require_admin));

    authenticated(routes, &app_state).layer(Extension(app_state.di_container.cache_admin.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_targets_everything() {
        assert_eq!(parse_invalidation(&Bytes::new()).unwrap().id, None);
        assert_eq!(parse_invalidation(&Bytes::from_static(b"  \n")).unwrap().id, None);
    }

    #[test]
    fn resource_specific_id_names_are_accepted() {
        let products = parse_invalidation(&Bytes::from_static(br#"{"product_id": 4}"#)).unwrap();
        assert_eq!(products.id, Some(4));

        let categories =
            parse_invalidation(&Bytes::from_static(br#"{"category_id": 9}"#)).unwrap();
        assert_eq!(categories.id, Some(9));
    }

    #[test]
    fn bad_bodies_are_rejected() {
        assert!(matches!(
            parse_invalidation(&Bytes::from_static(b"{oops")),
            Err(HttpError::BadRequest(_))
        ));
        assert!(matches!(
            parse_invalidation(&Bytes::from_static(br#"{"product_id": 0}"#)),
            Err(HttpError::BadRequest(_))
        ));
    }
}
