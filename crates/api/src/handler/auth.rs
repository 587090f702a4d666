use super::authenticated;
use crate::{middleware::validate::SimpleValidatedJson, state::AppState};
use axum::{
    Extension, Json,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use shared::{
    abstract_trait::DynAuthService,
    domain::{
        requests::{LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest},
        responses::{ApiResponse, LoginResponse, RefreshResponse, Session, UserResponse},
    },
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

fn token_cookie(value: String) -> Cookie<'static> {
    Cookie::build(("token", value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

#[utoipa::path(
    post,
    path = "/api/auth/register/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation error")
    ),
    tag = "Auth"
)]
pub async fn register_user_handler(
    Extension(service): Extension<DynAuthService>,
    SimpleValidatedJson(body): SimpleValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.register(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 400, description = "User account is disabled"),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many failed attempts")
    ),
    tag = "Auth"
)]
pub async fn login_user_handler(
    Extension(service): Extension<DynAuthService>,
    cookie_jar: CookieJar,
    SimpleValidatedJson(body): SimpleValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.login(&body).await?;
    let cookie_jar = cookie_jar.add(token_cookie(response.data.access.clone()));

    Ok((StatusCode::OK, cookie_jar, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh/",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token", body = ApiResponse<RefreshResponse>),
        (status = 401, description = "Refresh token is invalid or blacklisted")
    ),
    tag = "Auth"
)]
pub async fn refresh_token_handler(
    Extension(service): Extension<DynAuthService>,
    cookie_jar: CookieJar,
    SimpleValidatedJson(body): SimpleValidatedJson<RefreshTokenRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.refresh_token(&body).await?;
    let cookie_jar = cookie_jar.add(token_cookie(response.data.access.clone()));

    Ok((StatusCode::OK, cookie_jar, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout/",
    request_body = LogoutRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Refresh token blacklisted"),
        (status = 400, description = "Invalid token"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth"
)]
pub async fn logout_handler(
    Extension(service): Extension<DynAuthService>,
    Extension(session): Extension<Session>,
    cookie_jar: CookieJar,
    SimpleValidatedJson(body): SimpleValidatedJson<LogoutRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.logout(session.user_id, &body).await?;
    let cookie_jar = cookie_jar.remove(Cookie::build("token").path("/"));

    Ok((StatusCode::OK, cookie_jar, Json(response)))
}

pub fn auth_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public_routes = OpenApiRouter::new()
        .route("/api/auth/register/", post(register_user_handler))
        .route("/api/auth/login/", post(login_user_handler))
        .route("/api/auth/refresh/", post(refresh_token_handler))
        .layer(Extension(app_state.di_container.auth_service.clone()));

    let private_routes = authenticated(
        OpenApiRouter::new().route("/api/auth/logout/", post(logout_handler)),
        &app_state,
    )
    .layer(Extension(app_state.di_container.auth_service.clone()));

    public_routes.merge(private_routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_cookie_is_http_only_and_site_wide() {
        let cookie = token_cookie("abc".into());

        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
    }
}
