use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    TooManyRequests(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidCredentials => {
                HttpError::Unauthorized("Invalid credentials".to_string())
            }

            ServiceError::Validation(errors) => HttpError::BadRequest(errors.join("; ")),

            ServiceError::NotFound(msg) => HttpError::NotFound(msg),

            ServiceError::Forbidden(msg) => HttpError::Forbidden(msg),

            ServiceError::Unauthorized(msg) => HttpError::Unauthorized(msg),

            ServiceError::TooManyRequests(msg) => HttpError::TooManyRequests(msg),

            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => HttpError::NotFound("Not found".into()),
                RepositoryError::Conflict(msg) => HttpError::Conflict(msg),
                RepositoryError::AlreadyExists(msg) => HttpError::Conflict(msg),
                RepositoryError::ForeignKey(msg) => {
                    HttpError::BadRequest(format!("Foreign key violation: {msg}"))
                }
                RepositoryError::Sqlx(sqlx::Error::PoolTimedOut) => {
                    HttpError::ServiceUnavailable("Database is busy".into())
                }
                _ => HttpError::Internal("Repository error".into()),
            },

            ServiceError::Jwt(err) => HttpError::Unauthorized(format!("JWT error: {err}")),

            ServiceError::Internal(msg) => HttpError::Internal(msg),

            ServiceError::Bcrypt(_) => HttpError::Internal("Internal authentication error".into()),

            ServiceError::TokenExpired => HttpError::Unauthorized("Token expired".into()),

            ServiceError::InvalidTokenType => HttpError::Unauthorized("Invalid token type".into()),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            HttpError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            HttpError::TooManyRequests(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            HttpError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse {
            status: "error".into(),
            message: msg,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ServiceError) -> StatusCode {
        HttpError::from(err).into_response().status()
    }

    #[test]
    fn test_service_error_status_codes() {
        assert_eq!(
            status_of(ServiceError::validation("Cart is empty")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ServiceError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ServiceError::Forbidden("admins only".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(ServiceError::not_found("Product not found")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ServiceError::TooManyRequests("slow down".into())),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_of(ServiceError::TokenExpired),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ServiceError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_error_status_codes() {
        assert_eq!(
            status_of(ServiceError::Repo(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ServiceError::Repo(RepositoryError::AlreadyExists(
                "name".into()
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ServiceError::Repo(RepositoryError::ForeignKey(
                "category".into()
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ServiceError::Repo(RepositoryError::Custom("x".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_messages_are_joined() {
        match HttpError::from(ServiceError::Validation(vec!["a".into(), "b".into()])) {
            HttpError::BadRequest(msg) => assert_eq!(msg, "a; b"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
