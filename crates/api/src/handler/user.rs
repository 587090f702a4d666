use super::authenticated;
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
    routing::get,
};
use shared::{
    abstract_trait::DynUserService,
    domain::{
        requests::{CreateAdminRequest, FindAllUsers, UpdateUserRequest},
        responses::{ApiResponse, ApiResponsePagination, UserResponse},
    },
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/admin/users/",
    tag = "Admin Users",
    security(("bearer_auth" = [])),
    params(FindAllUsers),
    responses(
        (status = 200, description = "List of users", body = ApiResponsePagination<Vec<UserResponse>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only")
    )
)]
pub async fn get_users(
    Extension(service): Extension<DynUserService>,
    Query(params): Query<FindAllUsers>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/",
    tag = "Admin Users",
    security(("bearer_auth" = [])),
    request_body = CreateAdminRequest,
    responses(
        (status = 201, description = "Admin created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admins only")
    )
)]
pub async fn create_admin(
    Extension(service): Extension<DynUserService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateAdminRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_admin(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}/",
    tag = "Admin Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(service): Extension<DynUserService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/",
    tag = "Admin Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    Extension(service): Extension<DynUserService>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_user(id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}/",
    tag = "Admin Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(service): Extension<DynUserService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.delete_user(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn user_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let routes = OpenApiRouter::new()
        .route("/api/admin/users/", get(get_users).post(create_admin))
        .route(
            "/api/admin/users/{id}/",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .route_layer(middleware::from_fn(require_admin));

    authenticated(routes, &app_state).layer(Extension(app_state.di_container.user_service.clone()))
}
