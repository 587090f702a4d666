use axum::{
    Extension,
    body::Body,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{
    abstract_trait::{DynJwtService, DynProfileService},
    domain::responses::Session,
    errors::HttpError,
};

/// Reads the access token from the `token` cookie, falling back to a
/// `Bearer` authorization header.
pub fn extract_token(cookie_jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer "))
                .map(|token| token.trim().to_owned())
        })
        .filter(|token| !token.is_empty())
}

/// Resolves an access token to the cached session of an active user.
pub async fn authenticate(
    jwt: &DynJwtService,
    profile: &DynProfileService,
    token: &str,
) -> Result<Session, HttpError> {
    let user_id = jwt
        .verify_token(token, "access")
        .ok()
        .and_then(|claim| i32::try_from(claim).ok())
        .ok_or_else(|| HttpError::Unauthorized("Invalid token".to_string()))?;

    let session = profile.session(user_id).await?;

    Ok(session)
}

pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    Extension(profile): Extension<DynProfileService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = extract_token(&cookie_jar, req.headers()).ok_or_else(|| {
        HttpError::Unauthorized("You are not logged in, please provide token".to_string())
    })?;

    let session = authenticate(&jwt, &profile, &token).await?;

    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::HeaderValue;
    use axum_extra::extract::cookie::Cookie;
    use shared::{
        abstract_trait::{JwtServiceTrait, ProfileServiceTrait},
        config::JwtConfig,
        domain::{
            enums::UserType,
            requests::{ChangePasswordRequest, UpdateProfileRequest},
            responses::{ApiResponse, ProfileResponse, ProfileStatsResponse},
        },
        errors::ServiceError,
    };
    use std::sync::{Arc, Mutex};

    /// Answers every session lookup and remembers which ids were asked for.
    #[derive(Default)]
    struct EveryoneActive {
        asked: Mutex<Vec<i32>>,
    }

    #[async_trait]
    impl ProfileServiceTrait for EveryoneActive {
        async fn session(&self, user_id: i32) -> Result<Session, ServiceError> {
            self.asked.lock().unwrap().push(user_id);
            Ok(Session {
                user_id,
                username: "jane".into(),
                email: "jane@example.com".into(),
                user_type: UserType::Customer,
            })
        }

        async fn get_profile(
            &self,
            _user_id: i32,
        ) -> Result<ApiResponse<ProfileResponse>, ServiceError> {
            Err(ServiceError::Internal("not used".into()))
        }

        async fn update_profile(
            &self,
            _user_id: i32,
            _req: &UpdateProfileRequest,
        ) -> Result<ApiResponse<ProfileResponse>, ServiceError> {
            Err(ServiceError::Internal("not used".into()))
        }

        async fn change_password(
            &self,
            _user_id: i32,
            _req: &ChangePasswordRequest,
        ) -> Result<ApiResponse<()>, ServiceError> {
            Err(ServiceError::Internal("not used".into()))
        }

        async fn profile_stats(
            &self,
            _user_id: i32,
        ) -> Result<ApiResponse<ProfileStatsResponse>, ServiceError> {
            Err(ServiceError::Internal("not used".into()))
        }
    }

    fn services() -> (DynJwtService, Arc<EveryoneActive>) {
        (
            Arc::new(JwtConfig::new("middleware-test-secret")),
            Arc::new(EveryoneActive::default()),
        )
    }

    #[tokio::test]
    async fn access_token_resolves_to_session() {
        let (jwt, profiles) = services();
        let profile: DynProfileService = profiles.clone();
        let token = jwt.generate_token(42, "access").unwrap();

        let session = authenticate(&jwt, &profile, &token).await.unwrap();

        assert_eq!(session.user_id, 42);
        assert_eq!(*profiles.asked.lock().unwrap(), vec![42]);
    }

    #[tokio::test]
    async fn out_of_range_user_id_is_an_invalid_token() {
        let (jwt, profiles) = services();
        let profile: DynProfileService = profiles.clone();

        for claim in [i64::from(i32::MAX) + 1, i64::from(i32::MIN) - 1] {
            let token = jwt.generate_token(claim, "access").unwrap();
            let result = authenticate(&jwt, &profile, &token).await;

            assert!(matches!(
                result,
                Err(HttpError::Unauthorized(ref message)) if message == "Invalid token"
            ));
        }
        assert!(profiles.asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn refresh_token_is_not_an_access_token() {
        let (jwt, profiles) = services();
        let profile: DynProfileService = profiles.clone();
        let refresh = jwt.generate_token(42, "refresh").unwrap();

        assert!(matches!(
            authenticate(&jwt, &profile, &refresh).await,
            Err(HttpError::Unauthorized(_))
        ));
    }

    #[test]
    fn cookie_wins_over_header() {
        let jar = CookieJar::new().add(Cookie::new("token", "from-cookie"));
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );

        assert_eq!(
            extract_token(&jar, &headers).as_deref(),
            Some("from-cookie")
        );
    }

    #[test]
    fn bearer_header_is_used_without_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );

        assert_eq!(
            extract_token(&CookieJar::new(), &headers).as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn other_schemes_and_blank_tokens_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        assert_eq!(extract_token(&CookieJar::new(), &headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_token(&CookieJar::new(), &headers), None);
    }
}
