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
    routing::get,
};
use shared::{
    abstract_trait::{DynCategoryCommandService, DynCategoryQueryService},
    domain::{
        requests::{CreateCategoryRequest, FindAllCategories, UpdateCategoryRequest},
        responses::{ApiResponse, ApiResponsePagination, CategoryResponse},
    },
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/categories/",
    tag = "Category",
    params(FindAllCategories),
    responses(
        (status = 200, description = "Public category list", body = ApiResponsePagination<Vec<CategoryResponse>>)
    )
)]
pub async fn get_public_categories(
    Extension(service): Extension<DynCategoryQueryService>,
    Extension(policy): Extension<PublicCache>,
    Query(params): Query<FindAllCategories>,
) -> Result<impl IntoResponse, HttpError> {
    let lookup = service.find_public(&params).await?;
    Ok(cached_response(lookup, policy))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories/",
    tag = "Category",
    security(("bearer_auth" = [])),
    params(FindAllCategories),
    responses(
        (status = 200, description = "List of categories", body = ApiResponsePagination<Vec<CategoryResponse>>),
        (status = 403, description = "Admins only")
    )
)]
pub async fn get_categories(
    Extension(service): Extension<DynCategoryQueryService>,
    Query(params): Query<FindAllCategories>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories/{id}/",
    tag = "Category",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category details", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    Extension(service): Extension<DynCategoryQueryService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories/",
    tag = "Category",
    security(("bearer_auth" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponse>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Category with this name already exists")
    )
)]
pub async fn create_category(
    Extension(service): Extension<DynCategoryCommandService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_category(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}/",
    tag = "Category",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category with this name already exists")
    )
)]
pub async fn update_category(
    Extension(service): Extension<DynCategoryCommandService>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_category(id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}/",
    tag = "Category",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category and its products deleted"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    Extension(service): Extension<DynCategoryCommandService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.delete_category(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn category_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public_routes = OpenApiRouter::new()
        .route("/api/categories/", get(get_public_categories))
        .layer(Extension(PublicCache {
            max_age: app_state.public_max_age,
        }));

    let admin_routes = OpenApiRouter::new()
        .route(
            "/api/admin/categories/",
            get(get_categories).post(create_category),
        )
        .route(
            "/api/admin/categories/{id}/",
            get(get_category)
                .put(update_category)
                .patch(update_category)
                .delete(delete_category),
        )
        .route_layer(middleware::from_fn(require_admin));

    public_routes
        .merge(authenticated(admin_routes, &app_state))
        .layer(Extension(app_state.di_container.category_query.clone()))
        .layer(Extension(app_state.di_container.category_command.clone()))
}
