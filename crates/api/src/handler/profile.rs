use super::authenticated;
use crate::{middleware::validate::SimpleValidatedJson, state::AppState};
use axum::{
    Extension, Json,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use shared::{
    abstract_trait::DynProfileService,
    domain::{
        requests::{ChangePasswordRequest, UpdateProfileRequest},
        responses::{ApiResponse, ProfileResponse, ProfileStatsResponse, Session},
    },
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/auth/profile/",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = ApiResponse<ProfileResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_profile(
    Extension(service): Extension<DynProfileService>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.get_profile(session.user_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/auth/profile/",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_profile(
    Extension(service): Extension<DynProfileService>,
    Extension(session): Extension<Session>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_profile(session.user_id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/profile/change-password/",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Old password is incorrect or passwords don't match"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn change_password(
    Extension(service): Extension<DynProfileService>,
    Extension(session): Extension<Session>,
    SimpleValidatedJson(body): SimpleValidatedJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.change_password(session.user_id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/auth/profile/stats/",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile statistics", body = ApiResponse<ProfileStatsResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn profile_stats(
    Extension(service): Extension<DynProfileService>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.profile_stats(session.user_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn profile_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let routes = OpenApiRouter::new()
        .route(
            "/api/auth/profile/",
            get(get_profile).put(update_profile).patch(update_profile),
        )
        .route("/api/auth/profile/change-password/", post(change_password))
        .route("/api/auth/profile/stats/", get(profile_stats));

    authenticated(routes, &app_state)
}
