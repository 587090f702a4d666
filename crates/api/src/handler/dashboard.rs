use super::authenticated;
use crate::{
    middleware::role::{require_admin, require_customer},
    state::AppState,
};
use axum::{
    Extension, Json, http::StatusCode, middleware, response::IntoResponse, routing::get,
};
use shared::{
    abstract_trait::DynDashboardService,
    domain::responses::{
        AdminDashboardResponse, ApiResponse, CustomerDashboardResponse, Session,
    },
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User counts and recent sign-ups", body = ApiResponse<AdminDashboardResponse>),
        (status = 403, description = "Admins only")
    )
)]
pub async fn admin_dashboard(
    Extension(service): Extension<DynDashboardService>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.admin_dashboard(session.user_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/customer/dashboard/",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Customer welcome", body = ApiResponse<CustomerDashboardResponse>),
        (status = 403, description = "Customers only")
    )
)]
pub async fn customer_dashboard(
    Extension(service): Extension<DynDashboardService>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.customer_dashboard(session.user_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn dashboard_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let admin = OpenApiRouter::new()
        .route("/api/admin/dashboard/", get(admin_dashboard))
        .route_layer(middleware::from_fn(require_admin));

    let customer = OpenApiRouter::new()
        .route("/api/customer/dashboard/", get(customer_dashboard))
        .route_layer(middleware::from_fn(require_customer));

    authenticated(admin.merge(customer), &app_state)
        .layer(Extension(app_state.di_container.dashboard_service.clone()))
}
