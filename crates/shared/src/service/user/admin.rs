use crate::{
    abstract_trait::{
        DynHashing, DynUserCommandRepository, DynUserQueryRepository, UserServiceTrait,
    },
    cache::{CacheKey, CacheStore},
    domain::{
        enums::UserType,
        requests::{CreateAdminRequest, CreateUserRecord, FindAllUsers, PageRequest, UpdateUserRequest},
        responses::{ApiResponse, ApiResponsePagination, Pagination, UserResponse},
    },
    errors::{RepositoryError, ServiceError},
    utils::{Method, ServiceTracer},
};
use anyhow::Result;
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use tracing::{error, info};

pub struct UserServiceDeps {
    pub query: DynUserQueryRepository,
    pub command: DynUserCommandRepository,
    pub hashing: DynHashing,
    pub cache: CacheStore,
}

#[derive(Clone)]
pub struct UserService {
    query: DynUserQueryRepository,
    command: DynUserCommandRepository,
    hashing: DynHashing,
    cache: CacheStore,
    tracer: ServiceTracer,
}

impl UserService {
    pub fn new(deps: UserServiceDeps, registry: &mut Registry) -> Self {
        Self {
            query: deps.query,
            command: deps.command,
            hashing: deps.hashing,
            cache: deps.cache,
            tracer: ServiceTracer::new("user-service", registry),
        }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn find_all(
        &self,
        req: &FindAllUsers,
    ) -> Result<ApiResponsePagination<Vec<UserResponse>>, ServiceError> {
        let page = PageRequest::new(req.page, req.page_size);

        info!(
            "🔍 Finding users | Page: {}, Size: {}, Search: {:?}",
            page.page, page.page_size, req.search
        );

        let tracing_ctx = self.tracer.start(
            "user_find_all",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("page", page.page.to_string()),
                KeyValue::new("page_size", page.page_size.to_string()),
            ],
        );

        let (users, total) = match self.query.find_all(req).await {
            Ok(res) => res,
            Err(e) => {
                error!("❌ Failed to fetch users: {e:?}");
                self.tracer
                    .complete_error(&tracing_ctx, Method::Get, "Failed to fetch users");
                return Err(ServiceError::Repo(e));
            }
        };

        let data: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

        info!("✅ Found {} users (total: {total})", data.len());
        self.tracer
            .complete_success(&tracing_ctx, Method::Get, "Users retrieved");

        Ok(ApiResponsePagination::success(
            "Users retrieved successfully",
            data,
            Pagination::new(&page, total),
        ))
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<UserResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "user_find_by_id",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("user_id", id.to_string()),
            ],
        );

        let result = match self.query.find_by_id(id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(ServiceError::not_found(format!("User with id {id} not found"))),
            Err(e) => Err(ServiceError::Repo(e)),
        };

        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "User retrieved")
            .map(|user| ApiResponse::success("User retrieved successfully", user.into()))
    }

    async fn create_admin(
        &self,
        req: &CreateAdminRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError> {
        info!("👑 Creating admin account: {}", req.username);

        let tracing_ctx = self.tracer.start(
            "user_create_admin",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("username", req.username.clone()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            if self.query.find_by_username(&req.username).await?.is_some() {
                return Err(ServiceError::validation(
                    "A user with that username already exists.",
                ));
            }

            let password_hash = self.hashing.hash_password(&req.password).await?;

            let record = CreateUserRecord {
                username: req.username.clone(),
                email: req.email.clone(),
                password_hash,
                first_name: req.first_name.clone(),
                last_name: req.last_name.clone(),
                phone: req.phone.clone(),
                address: req.address.clone(),
                user_type: UserType::Admin,
            };

            Ok(self.command.create_user(&record).await?)
        }
        .await;

        self.tracer
            .finish(&tracing_ctx, Method::Post, result, "Admin created")
            .map(|user| ApiResponse::success("Admin user created successfully", user.into()))
    }

    async fn update_user(
        &self,
        id: i32,
        req: &UpdateUserRequest,
    ) -> Result<ApiResponse<UserResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "user_update",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("user_id", id.to_string()),
            ],
        );

        let result = match self.command.update_user(id, req).await {
            Ok(user) => {
                self.cache.delete_from_cache(&CacheKey::session(id)).await;
                Ok(user)
            }
            Err(RepositoryError::NotFound) => {
                Err(ServiceError::not_found(format!("User with id {id} not found")))
            }
            Err(e) => Err(ServiceError::Repo(e)),
        };

        self.tracer
            .finish(&tracing_ctx, Method::Put, result, "User updated")
            .map(|user| ApiResponse::success("User updated successfully", user.into()))
    }

    async fn delete_user(&self, id: i32) -> Result<ApiResponse<()>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "user_delete",
            vec![
                KeyValue::new("component", "user"),
                KeyValue::new("user_id", id.to_string()),
            ],
        );

        let result = match self.command.delete_user(id).await {
            Ok(()) => {
                self.cache.delete_from_cache(&CacheKey::session(id)).await;
                info!("🗑️ Deleted user {id}");
                Ok(())
            }
            Err(RepositoryError::NotFound) => {
                Err(ServiceError::not_found(format!("User with id {id} not found")))
            }
            Err(e) => Err(ServiceError::Repo(e)),
        };

        self.tracer
            .finish(&tracing_ctx, Method::Delete, result, "User deleted")
            .map(|_| ApiResponse::success("User deleted successfully", ()))
    }
}
