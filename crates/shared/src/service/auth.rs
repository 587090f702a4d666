use crate::{
    abstract_trait::{
        AuthServiceTrait, DynHashing, DynJwtService, DynRefreshTokenCommandRepository,
        DynRefreshTokenQueryRepository, DynUserCommandRepository, DynUserQueryRepository,
    },
    cache::{CacheKey, CacheStore},
    domain::{
        enums::UserType,
        requests::{
            CreateUserRecord, LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest,
        },
        responses::{ApiResponse, LoginResponse, RefreshResponse, UserResponse},
    },
    errors::ServiceError,
    model::User,
    utils::{Method, ServiceTracer},
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use tracing::{error, info, warn};

/// Failed logins allowed per username inside [`LOGIN_LOCKOUT_MINUTES`].
pub const MAX_LOGIN_ATTEMPTS: i64 = 5;
pub const LOGIN_LOCKOUT_MINUTES: i64 = 15;

pub struct AuthServiceDeps {
    pub user_query: DynUserQueryRepository,
    pub user_command: DynUserCommandRepository,
    pub token_query: DynRefreshTokenQueryRepository,
    pub token_command: DynRefreshTokenCommandRepository,
    pub hashing: DynHashing,
    pub jwt: DynJwtService,
    pub cache: CacheStore,
}

#[derive(Clone)]
pub struct AuthService {
    user_query: DynUserQueryRepository,
    user_command: DynUserCommandRepository,
    token_query: DynRefreshTokenQueryRepository,
    token_command: DynRefreshTokenCommandRepository,
    hashing: DynHashing,
    jwt: DynJwtService,
    cache: CacheStore,
    tracer: ServiceTracer,
}

impl AuthService {
    pub fn new(deps: AuthServiceDeps, registry: &mut Registry) -> Self {
        let AuthServiceDeps {
            user_query,
            user_command,
            token_query,
            token_command,
            hashing,
            jwt,
            cache,
        } = deps;

        Self {
            user_query,
            user_command,
            token_query,
            token_command,
            hashing,
            jwt,
            cache,
            tracer: ServiceTracer::new("auth-service", registry),
        }
    }

    async fn record_failed_login(&self, attempts_key: &str) {
        let count = self
            .cache
            .increment(attempts_key, Duration::minutes(LOGIN_LOCKOUT_MINUTES))
            .await;

        warn!("🔒 Failed login attempt recorded ({attempts_key}: {count:?})");
    }

    async fn authenticate(&self, req: &LoginRequest) -> Result<User, ServiceError> {
        let attempts_key = CacheKey::login_attempts(&req.username);

        let attempts = self
            .cache
            .get_from_cache::<i64>(&attempts_key)
            .await
            .unwrap_or(0);

        if attempts >= MAX_LOGIN_ATTEMPTS {
            return Err(ServiceError::TooManyRequests(format!(
                "Too many failed login attempts. Try again in {LOGIN_LOCKOUT_MINUTES} minutes."
            )));
        }

        let Some(user) = self.user_query.find_by_username(&req.username).await? else {
            self.record_failed_login(&attempts_key).await;
            return Err(ServiceError::InvalidCredentials);
        };

        if let Err(e) = self
            .hashing
            .compare_password(&user.password, &req.password)
            .await
        {
            if matches!(e, ServiceError::InvalidCredentials) {
                self.record_failed_login(&attempts_key).await;
            }
            return Err(e);
        }

        if !user.is_active {
            return Err(ServiceError::validation("User account is disabled"));
        }

        self.cache.delete_from_cache(&attempts_key).await;

        Ok(user)
    }

    async fn issue_tokens(&self, user: User) -> Result<LoginResponse, ServiceError> {
        let user_id = i64::from(user.id);

        let access = self.jwt.generate_token(user_id, "access")?;
        let refresh = self.jwt.generate_token(user_id, "refresh")?;

        let expires_at = (Utc::now() + self.jwt.lifetime("refresh")?).naive_utc();

        self.user_command.touch_last_login(user.id).await?;
        self.token_command.delete_by_user_id(user.id).await?;
        self.token_command
            .create(user.id, &refresh, expires_at)
            .await?;

        Ok(LoginResponse {
            refresh,
            access,
            user: UserResponse::from(user),
        })
    }
}

#[async_trait]
impl AuthServiceTrait for AuthService {
    async fn register(
        &self,
        req: &RegisterRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError> {
        info!("📝 Registering user: {}", req.username);

        let tracing_ctx = self.tracer.start(
            "auth_register",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("username", req.username.clone()),
            ],
        );

        let existing = match self.user_query.find_by_username(&req.username).await {
            Ok(existing) => existing,
            Err(e) => {
                error!("❌ Failed to check username '{}': {e:?}", req.username);
                self.tracer
                    .complete_error(&tracing_ctx, Method::Post, "Username lookup failed");
                return Err(ServiceError::Repo(e));
            }
        };

        if existing.is_some() {
            self.tracer
                .complete_error(&tracing_ctx, Method::Post, "Username already taken");
            return Err(ServiceError::validation(
                "A user with that username already exists.",
            ));
        }

        let password_hash = match self.hashing.hash_password(&req.password).await {
            Ok(hash) => hash,
            Err(e) => {
                self.tracer
                    .complete_error(&tracing_ctx, Method::Post, "Password hashing failed");
                return Err(e);
            }
        };

        let record = CreateUserRecord {
            username: req.username.clone(),
            email: req.email.clone(),
            password_hash,
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            phone: req.phone.clone(),
            address: req.address.clone(),
            user_type: UserType::Customer,
        };

        let user = match self.user_command.create_user(&record).await {
            Ok(user) => user,
            Err(e) => {
                error!("❌ Failed to create user '{}': {e:?}", req.username);
                self.tracer
                    .complete_error(&tracing_ctx, Method::Post, "User creation failed");
                return Err(ServiceError::Repo(e));
            }
        };

        info!("✅ Registered user {} (id: {})", user.username, user.id);
        self.tracer
            .complete_success(&tracing_ctx, Method::Post, "User registered");

        Ok(ApiResponse::success(
            "User registered successfully",
            UserResponse::from(user),
        ))
    }

    async fn login(&self, req: &LoginRequest) -> Result<ApiResponse<LoginResponse>, ServiceError> {
        info!("🔐 Login attempt for: {}", req.username);

        let tracing_ctx = self.tracer.start(
            "auth_login",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("username", req.username.clone()),
            ],
        );

        let result = match self.authenticate(req).await {
            Ok(user) => self.issue_tokens(user).await,
            Err(e) => Err(e),
        };

        self.tracer
            .finish(&tracing_ctx, Method::Post, result, "Login successful")
            .map(|tokens| ApiResponse::success("Login successful", tokens))
    }

    async fn refresh_token(
        &self,
        req: &RefreshTokenRequest,
    ) -> Result<ApiResponse<RefreshResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "auth_refresh_token",
            vec![KeyValue::new("component", "auth")],
        );

        let result: Result<RefreshResponse, ServiceError> = async {
            let user_id = self.jwt.verify_token(&req.refresh, "refresh")?;

            match self.token_query.find_by_token(&req.refresh).await? {
                Some(stored) if i64::from(stored.user_id) == user_id => {}
                _ => {
                    return Err(ServiceError::Unauthorized(
                        "Refresh token is no longer valid".to_string(),
                    ));
                }
            }

            let access = self.jwt.generate_token(user_id, "access")?;
            Ok(RefreshResponse { access })
        }
        .await;

        self.tracer
            .finish(&tracing_ctx, Method::Post, result, "Access token refreshed")
            .map(|data| ApiResponse::success("Token refreshed successfully", data))
    }

    async fn logout(
        &self,
        user_id: i32,
        req: &LogoutRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "auth_logout",
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user_id", user_id.to_string()),
            ],
        );

        let result: Result<(), ServiceError> = async {
            let owner = self
                .jwt
                .verify_token(&req.refresh, "refresh")
                .map_err(|_| ServiceError::validation("Invalid token"))?;

            if owner != i64::from(user_id) {
                return Err(ServiceError::validation("Invalid token"));
            }

            if !self.token_command.delete_token(&req.refresh).await? {
                return Err(ServiceError::validation("Invalid token"));
            }

            Ok(())
        }
        .await;

        self.tracer
            .finish(&tracing_ctx, Method::Post, result, "Refresh token blacklisted")
            .map(|_| ApiResponse::success("Successfully logged out", ()))
    }
}
