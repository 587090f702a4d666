mod auth;
mod cache;
mod cart;
mod category;
mod dashboard;
mod order;
mod product;
mod profile;
mod user;
mod websocket;

use crate::{middleware::jwt::auth_middleware, state::AppState};
use anyhow::Result;
use axum::{
    Extension, Json,
    extract::{DefaultBodyLimit, State},
    http::{HeaderName, StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use prometheus_client::encoding::text::encode;
use serde::Serialize;
use serde_json::json;
use shared::{domain::responses::CacheLookup, utils::shutdown_signal};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;
use utoipa::{Modify, OpenApi, openapi::security::SecurityScheme};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub use self::auth::auth_routes;
pub use self::cache::cache_routes;
pub use self::cart::cart_routes;
pub use self::category::category_routes;
pub use self::dashboard::dashboard_routes;
pub use self::order::order_routes;
pub use self::product::product_routes;
pub use self::profile::profile_routes;
pub use self::user::user_routes;
pub use self::websocket::websocket_routes;

const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

pub const X_CACHE_STATUS: HeaderName = HeaderName::from_static("x-cache-status");

#[derive(OpenApi)]
#[openapi(
    paths(
        health_checker_handler,

        auth::register_user_handler,
        auth::login_user_handler,
        auth::refresh_token_handler,
        auth::logout_handler,

        profile::get_profile,
        profile::update_profile,
        profile::change_password,
        profile::profile_stats,

        user::get_users,
        user::create_admin,
        user::get_user,
        user::update_user,
        user::delete_user,

        dashboard::admin_dashboard,
        dashboard::customer_dashboard,

        category::get_public_categories,
        category::get_categories,
        category::get_category,
        category::create_category,
        category::update_category,
        category::delete_category,

        product::get_public_products,
        product::get_public_product,
        product::get_products,
        product::get_product,
        product::create_product,
        product::update_product,
        product::update_stock,
        product::delete_product,

        cart::get_cart,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_cart_item,
        cart::clear_cart,

        order::create_order,
        order::get_my_orders,
        order::get_my_order,
        order::get_orders,
        order::get_order,
        order::update_order_status,

        cache::cache_stats,
        cache::clear_cache,
        cache::invalidate_products,
        cache::invalidate_categories,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Platform", description = "Health endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Profile", description = "Signed-in user profile"),
        (name = "Admin Users", description = "User administration"),
        (name = "Dashboard", description = "Dashboards"),
        (name = "Category", description = "Category endpoints"),
        (name = "Product", description = "Product endpoints"),
        (name = "Cart", description = "Shopping cart endpoints"),
        (name = "Order", description = "Order endpoints"),
        (name = "Cache", description = "Cache administration"),
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

/// `max-age` advertised on the public catalogue endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PublicCache {
    pub max_age: i64,
}

/// Wraps a cache-aside read with `Cache-Control` and `X-Cache-Status`.
pub fn cached_response<T: Serialize>(
    lookup: CacheLookup<T>,
    policy: PublicCache,
) -> impl IntoResponse {
    let cache_status = if lookup.hit { "HIT" } else { "MISS" };

    (
        StatusCode::OK,
        [
            (
                header::CACHE_CONTROL,
                format!("public, max-age={}", policy.max_age),
            ),
            (X_CACHE_STATUS, cache_status.to_string()),
        ],
        Json(lookup.data),
    )
}

/// Puts the auth middleware in front of every route added so far.
pub(crate) fn authenticated(router: OpenApiRouter, app_state: &AppState) -> OpenApiRouter {
    router
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.profile_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}

#[utoipa::path(
    get,
    path = "/api/health/",
    tag = "Platform",
    responses((status = 200, description = "Service is alive"))
)]
pub async fn health_checker_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": "Storefront API is running",
            "timestamp": Utc::now(),
        })),
    )
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut buffer = String::new();

    let registry = state.registry.lock().await;

    if let Err(e) = encode(&mut buffer, &registry) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}"),
        );
    }

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        buffer,
    )
}

pub struct AppRouter;

impl AppRouter {
    pub fn build(app_state: AppState) -> axum::Router {
        let shared_state = Arc::new(app_state);

        let api_router = OpenApiRouter::with_openapi(ApiDoc::openapi())
            .route("/metrics", get(metrics_handler))
            .with_state(shared_state.clone())
            .route("/api/health/", get(health_checker_handler))
            .merge(auth_routes(shared_state.clone()))
            .merge(profile_routes(shared_state.clone()))
            .merge(user_routes(shared_state.clone()))
            .merge(dashboard_routes(shared_state.clone()))
            .merge(category_routes(shared_state.clone()))
            .merge(product_routes(shared_state.clone()))
            .merge(cart_routes(shared_state.clone()))
            .merge(order_routes(shared_state.clone()))
            .merge(cache_routes(shared_state.clone()))
            .merge(websocket_routes(shared_state.clone()));

        let router_with_layers = api_router
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http());

        let (app_router, api) = router_with_layers.split_for_parts();

        app_router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
    }

    pub async fn serve(port: u16, app_state: AppState) -> Result<()> {
        let app = Self::build(app_state);

        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr).await?;

        info!("🚀 Server running on http://{}", listener.local_addr()?);
        info!("📖 Swagger UI: http://localhost:{port}/swagger-ui");
        info!("📊 Metrics: http://localhost:{port}/metrics");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_response_reports_hit_and_max_age() {
        let response =
            cached_response(CacheLookup::hit(vec![1, 2, 3]), PublicCache { max_age: 3600 })
                .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=3600"
        );
        assert_eq!(response.headers()[X_CACHE_STATUS], "HIT");
    }

    #[test]
    fn cached_response_reports_miss() {
        let response = cached_response(CacheLookup::miss("fresh"), PublicCache { max_age: 60 })
            .into_response();

        assert_eq!(response.headers()[X_CACHE_STATUS], "MISS");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=60");
    }

    #[test]
    fn openapi_lists_public_and_admin_paths() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/health/",
            "/api/auth/login/",
            "/api/products/",
            "/api/products/{id}/",
            "/api/admin/orders/{id}/status/",
            "/api/admin/cache/stats/",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
