use crate::{
    abstract_trait::{
        DynHashing, DynUserCommandRepository, DynUserQueryRepository, ProfileServiceTrait,
    },
    cache::{CacheKey, CacheStore},
    domain::{
        requests::{ChangePasswordRequest, UpdateProfileRequest},
        responses::{ApiResponse, ProfileResponse, ProfileStatsResponse, Session},
    },
    errors::ServiceError,
    model::User,
    utils::{Method, ServiceTracer},
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use tracing::{debug, info};

pub const SESSION_TTL_MINUTES: i64 = 30;

pub struct ProfileServiceDeps {
    pub query: DynUserQueryRepository,
    pub command: DynUserCommandRepository,
    pub hashing: DynHashing,
    pub cache: CacheStore,
}

#[derive(Clone)]
pub struct ProfileService {
    query: DynUserQueryRepository,
    command: DynUserCommandRepository,
    hashing: DynHashing,
    cache: CacheStore,
    tracer: ServiceTracer,
}

impl ProfileService {
    pub fn new(deps: ProfileServiceDeps, registry: &mut Registry) -> Self {
        Self {
            query: deps.query,
            command: deps.command,
            hashing: deps.hashing,
            cache: deps.cache,
            tracer: ServiceTracer::new("profile-service", registry),
        }
    }

    async fn load_user(&self, user_id: i32) -> Result<User, ServiceError> {
        self.query
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))
    }
}

#[async_trait]
impl ProfileServiceTrait for ProfileService {
    /// Resolves a token's user id to a live account, cached per user.
    async fn session(&self, user_id: i32) -> Result<Session, ServiceError> {
        let key = CacheKey::session(user_id);

        if let Some(session) = self.cache.get_from_cache::<Session>(&key).await {
            debug!("Session cache hit for user {user_id}");
            return Ok(session);
        }

        let user = match self.query.find_by_id(user_id).await? {
            Some(user) if user.is_active => user,
            _ => {
                return Err(ServiceError::Unauthorized(
                    "User not found or inactive".to_string(),
                ));
            }
        };

        let session = Session::from(&user);
        self.cache
            .set_to_cache(&key, &session, Duration::minutes(SESSION_TTL_MINUTES))
            .await;

        Ok(session)
    }

    async fn get_profile(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<ProfileResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "profile_get",
            vec![
                KeyValue::new("component", "profile"),
                KeyValue::new("user_id", user_id.to_string()),
            ],
        );

        let result = self.load_user(user_id).await;

        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "Profile retrieved")
            .map(|user| ApiResponse::success("Profile retrieved successfully", user.into()))
    }

    async fn update_profile(
        &self,
        user_id: i32,
        req: &UpdateProfileRequest,
    ) -> Result<ApiResponse<ProfileResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "profile_update",
            vec![
                KeyValue::new("component", "profile"),
                KeyValue::new("user_id", user_id.to_string()),
            ],
        );

        let result = self
            .command
            .update_profile(user_id, req)
            .await
            .map_err(ServiceError::from);

        if result.is_ok() {
            self.cache.delete_from_cache(&CacheKey::session(user_id)).await;
            info!("✏️ Profile updated for user {user_id}");
        }

        self.tracer
            .finish(&tracing_ctx, Method::Put, result, "Profile updated")
            .map(|user| ApiResponse::success("Profile updated successfully", user.into()))
    }

    async fn change_password(
        &self,
        user_id: i32,
        req: &ChangePasswordRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "profile_change_password",
            vec![
                KeyValue::new("component", "profile"),
                KeyValue::new("user_id", user_id.to_string()),
            ],
        );

        let result: Result<(), ServiceError> = async {
            let user = self.load_user(user_id).await?;

            self.hashing
                .compare_password(&user.password, &req.old_password)
                .await
                .map_err(|e| match e {
                    ServiceError::InvalidCredentials => {
                        ServiceError::validation("Old password is incorrect")
                    }
                    other => other,
                })?;

            let hashed = self.hashing.hash_password(&req.new_password).await?;
            self.command.update_password(user_id, &hashed).await?;
            Ok(())
        }
        .await;

        self.tracer
            .finish(&tracing_ctx, Method::Post, result, "Password changed")
            .map(|_| ApiResponse::success("Password changed successfully", ()))
    }

    async fn profile_stats(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<ProfileStatsResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "profile_stats",
            vec![
                KeyValue::new("component", "profile"),
                KeyValue::new("user_id", user_id.to_string()),
            ],
        );

        let result = self.load_user(user_id).await;

        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "Profile stats computed")
            .map(|user| {
                ApiResponse::success(
                    "Profile stats retrieved successfully",
                    ProfileStatsResponse::from(&user),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::HashingTrait,
        config::Hashing,
        domain::enums::UserType,
        model::user_fixtures::user,
        service::fakes::{FakeStore, memory_cache},
    };
    use std::sync::Arc;

    fn service(store: &Arc<FakeStore>, cache: CacheStore) -> ProfileService {
        let mut registry = Registry::default();
        ProfileService::new(
            ProfileServiceDeps {
                query: store.clone(),
                command: store.clone(),
                hashing: Arc::new(Hashing::new(4)),
                cache,
            },
            &mut registry,
        )
    }

    #[tokio::test]
    async fn session_is_cached_until_profile_changes() {
        let store = FakeStore::new();
        let cache = memory_cache();
        let profiles = service(&store, cache.clone());
        let jane = store.insert_user(user(0, "jane", UserType::Customer));

        let session = profiles.session(jane.id).await.unwrap();
        assert_eq!(session.username, "jane");
        assert!(
            cache
                .get_from_cache::<Session>(&CacheKey::session(jane.id))
                .await
                .is_some()
        );

        profiles
            .update_profile(
                jane.id,
                &UpdateProfileRequest {
                    email: Some("jane@shop.test".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let refreshed = profiles.session(jane.id).await.unwrap();
        assert_eq!(refreshed.email, "jane@shop.test");
    }

    #[tokio::test]
    async fn inactive_or_missing_users_have_no_session() {
        let store = FakeStore::new();
        let profiles = service(&store, memory_cache());
        let mut sleepy = user(0, "sleepy", UserType::Customer);
        sleepy.is_active = false;
        let sleepy = store.insert_user(sleepy);

        assert!(matches!(
            profiles.session(sleepy.id).await,
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(matches!(
            profiles.session(999).await,
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn change_password_checks_the_old_one() {
        let store = FakeStore::new();
        let profiles = service(&store, memory_cache());
        let hashing = Hashing::new(4);
        let mut jane = user(0, "jane", UserType::Customer);
        jane.password = hashing.hash_password("old-password").await.unwrap();
        let jane = store.insert_user(jane);

        let wrong = ChangePasswordRequest {
            old_password: "not-it".into(),
            new_password: "new-password".into(),
            confirm_password: "new-password".into(),
        };
        assert!(matches!(
            profiles.change_password(jane.id, &wrong).await,
            Err(ServiceError::Validation(_))
        ));

        let right = ChangePasswordRequest {
            old_password: "old-password".into(),
            ..wrong
        };
        profiles.change_password(jane.id, &right).await.unwrap();

        let stored = store.user(jane.id).unwrap();
        assert!(
            hashing
                .compare_password(&stored.password, "new-password")
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn profile_reports_full_name_and_flags() {
        let store = FakeStore::new();
        let profiles = service(&store, memory_cache());
        let mut boss = user(0, "boss", UserType::Admin);
        boss.first_name = "Ada".into();
        boss.last_name = "Lovelace".into();
        let boss = store.insert_user(boss);

        let profile = profiles.get_profile(boss.id).await.unwrap().data;
        assert_eq!(profile.full_name, "Ada Lovelace");
        assert!(profile.is_admin);

        let stats = profiles.profile_stats(boss.id).await.unwrap().data;
        assert_eq!(stats.user_id, boss.id);
        assert!(!stats.profile_complete);
    }
}
