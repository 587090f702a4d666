use crate::{
    abstract_trait::{DashboardServiceTrait, DynUserQueryRepository},
    domain::responses::{
        AdminDashboardResponse, ApiResponse, CustomerDashboardResponse, ProfileResponse,
        UserResponse,
    },
    errors::ServiceError,
    model::User,
    utils::{Method, ServiceTracer},
};
use anyhow::Result;
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;

const RECENT_USERS: i64 = 5;

#[derive(Clone)]
pub struct DashboardService {
    query: DynUserQueryRepository,
    tracer: ServiceTracer,
}

impl DashboardService {
    pub fn new(query: DynUserQueryRepository, registry: &mut Registry) -> Self {
        Self {
            query,
            tracer: ServiceTracer::new("dashboard-service", registry),
        }
    }

    async fn current_user(&self, user_id: i32) -> Result<User, ServiceError> {
        self.query
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))
    }
}

#[async_trait]
impl DashboardServiceTrait for DashboardService {
    async fn admin_dashboard(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<AdminDashboardResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "dashboard_admin",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result: Result<_, ServiceError> = async {
            let user = self.current_user(user_id).await?;
            let counts = self.query.count_by_type().await?;
            let recent = self.query.find_recent(RECENT_USERS).await?;

            Ok(AdminDashboardResponse {
                dashboard_type: "admin".to_string(),
                total_users: counts.total_users,
                admin_users: counts.admin_users,
                customer_users: counts.customer_users,
                recent_users: recent.into_iter().map(UserResponse::from).collect(),
                user_info: ProfileResponse::from(user),
            })
        }
        .await;

        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "Admin dashboard built")
            .map(|data| ApiResponse::success("Admin dashboard", data))
    }

    async fn customer_dashboard(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<CustomerDashboardResponse>, ServiceError> {
        let tracing_ctx = self.tracer.start(
            "dashboard_customer",
            vec![KeyValue::new("user_id", user_id.to_string())],
        );

        let result = self.current_user(user_id).await;

        self.tracer
            .finish(&tracing_ctx, Method::Get, result, "Customer dashboard built")
            .map(|user| {
                ApiResponse::success(
                    "Customer dashboard",
                    CustomerDashboardResponse {
                        dashboard_type: "customer".to_string(),
                        message: "Welcome to your customer dashboard".to_string(),
                        user_info: ProfileResponse::from(user),
                    },
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::enums::UserType, model::user_fixtures::user, service::fakes::FakeStore};

    #[tokio::test]
    async fn admin_dashboard_counts_and_lists_recent_users() {
        let store = FakeStore::new();
        let mut registry = Registry::default();
        let dashboards = DashboardService::new(store.clone(), &mut registry);

        let boss = store.insert_user(user(0, "boss", UserType::Admin));
        for i in 0..6 {
            store.insert_user(user(0, &format!("customer{i}"), UserType::Customer));
        }

        let data = dashboards.admin_dashboard(boss.id).await.unwrap().data;

        assert_eq!(data.dashboard_type, "admin");
        assert_eq!(data.total_users, 7);
        assert_eq!(data.admin_users, 1);
        assert_eq!(data.customer_users, 6);
        assert_eq!(data.recent_users.len(), 5);
        assert_eq!(data.recent_users[0].username, "customer5");
        assert_eq!(data.user_info.username, "boss");
    }

    #[tokio::test]
    async fn customer_dashboard_greets() {
        let store = FakeStore::new();
        let mut registry = Registry::default();
        let dashboards = DashboardService::new(store.clone(), &mut registry);
        let jane = store.insert_user(user(0, "jane", UserType::Customer));

        let data = dashboards.customer_dashboard(jane.id).await.unwrap().data;
        assert_eq!(data.dashboard_type, "customer");
        assert_eq!(data.message, "Welcome to your customer dashboard");
    }
}
