use axum::{
    Extension,
    body::Body,
    http::Request,
    middleware::Next,
    response::IntoResponse,
};
use shared::{domain::responses::Session, errors::HttpError};

pub async fn require_admin(
    Extension(session): Extension<Session>,
    req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    if !session.is_admin() {
        return Err(HttpError::Forbidden(
            "Access denied. Required role: admin".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

pub async fn require_customer(
    Extension(session): Extension<Session>,
    req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    if !session.is_customer() {
        return Err(HttpError::Forbidden(
            "Access denied. Required role: customer".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, middleware, routing::get};
    use shared::domain::enums::UserType;
    use tower::ServiceExt;

    fn session(user_type: UserType) -> Session {
        Session {
            user_id: 1,
            username: "jane".into(),
            email: "jane@example.com".into(),
            user_type,
        }
    }

    fn app(user_type: UserType) -> Router {
        Router::new()
            .route("/admin", get(|| async { "ok" }))
            .route_layer(middleware::from_fn(require_admin))
            .layer(Extension(session(user_type)))
    }

    fn customer_app(user_type: UserType) -> Router {
        Router::new()
            .route("/cart", get(|| async { "ok" }))
            .route_layer(middleware::from_fn(require_customer))
            .layer(Extension(session(user_type)))
    }

    async fn status(router: Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn admin_guard() {
        assert_eq!(status(app(UserType::Admin), "/admin").await, StatusCode::OK);
        assert_eq!(
            status(app(UserType::Customer), "/admin").await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn customer_guard() {
        assert_eq!(
            status(customer_app(UserType::Customer), "/cart").await,
            StatusCode::OK
        );
        assert_eq!(
            status(customer_app(UserType::Admin), "/cart").await,
            StatusCode::FORBIDDEN
        );
    }
}
