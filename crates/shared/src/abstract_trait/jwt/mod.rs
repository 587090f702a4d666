use crate::errors::ServiceError;
use anyhow::Result;
use chrono::Duration;
use std::sync::Arc;

pub type DynJwtService = Arc<dyn JwtServiceTrait + Send + Sync>;

pub trait JwtServiceTrait: Send + Sync + std::fmt::Debug {
    fn generate_token(&self, user_id: i64, token_type: &str) -> Result<String, ServiceError>;
    fn verify_token(&self, token: &str, expected_type: &str) -> Result<i64, ServiceError>;
    fn lifetime(&self, token_type: &str) -> Result<Duration, ServiceError>;
}
