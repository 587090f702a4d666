use crate::{abstract_trait::JwtServiceTrait, errors::ServiceError};
use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: usize,
    pub iat: usize,
    pub token_type: String,
    pub jti: String,
}

impl Claims {
    pub fn new(user_id: i64, exp: usize, iat: usize, token_type: String) -> Self {
        Claims {
            user_id,
            exp,
            iat,
            token_type,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl JwtConfig {
    pub fn new(jwt_secret: &str) -> Self {
        Self::with_lifetimes(jwt_secret, Duration::minutes(60), Duration::days(7))
    }

    pub fn with_lifetimes(
        jwt_secret: &str,
        access_token_ttl: Duration,
        refresh_token_ttl: Duration,
    ) -> Self {
        JwtConfig {
            jwt_secret: jwt_secret.to_string(),
            access_token_ttl,
            refresh_token_ttl,
        }
    }
}

impl JwtServiceTrait for JwtConfig {
    fn generate_token(&self, user_id: i64, token_type: &str) -> Result<String, ServiceError> {
        let now = Utc::now();
        let iat = now.timestamp() as usize;
        let exp = (now + self.lifetime(token_type)?).timestamp() as usize;

        let claims = Claims::new(user_id, exp, iat, token_type.to_string());

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(ServiceError::Jwt)
    }

    fn verify_token(&self, token: &str, expected_type: &str) -> Result<i64, ServiceError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                _ => ServiceError::Jwt(e),
            })?;

        let current_time = Utc::now().timestamp() as usize;

        if token_data.claims.exp < current_time {
            return Err(ServiceError::TokenExpired);
        }

        if token_data.claims.token_type != expected_type {
            return Err(ServiceError::InvalidTokenType);
        }

        Ok(token_data.claims.user_id)
    }

    fn lifetime(&self, token_type: &str) -> Result<Duration, ServiceError> {
        match token_type {
            "access" => Ok(self.access_token_ttl),
            "refresh" => Ok(self.refresh_token_ttl),
            _ => Err(ServiceError::InvalidTokenType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trip() {
        let jwt = JwtConfig::new("test-secret");
        let token = jwt.generate_token(42, "access").unwrap();

        assert_eq!(jwt.verify_token(&token, "access").unwrap(), 42);
    }

    #[test]
    fn refresh_token_is_rejected_as_access_token() {
        let jwt = JwtConfig::new("test-secret");
        let token = jwt.generate_token(7, "refresh").unwrap();

        assert!(matches!(
            jwt.verify_token(&token, "access"),
            Err(ServiceError::InvalidTokenType)
        ));
    }

    #[test]
    fn tokens_are_unique_per_issue() {
        let jwt = JwtConfig::new("test-secret");
        let first = jwt.generate_token(7, "refresh").unwrap();
        let second = jwt.generate_token(7, "refresh").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn token_signed_with_other_secret_fails() {
        let issuer = JwtConfig::new("secret-a");
        let verifier = JwtConfig::new("secret-b");
        let token = issuer.generate_token(1, "access").unwrap();

        assert!(matches!(
            verifier.verify_token(&token, "access"),
            Err(ServiceError::Jwt(_))
        ));
    }

    #[test]
    fn expired_token_is_reported() {
        let jwt = JwtConfig::with_lifetimes(
            "test-secret",
            Duration::minutes(-10),
            Duration::days(7),
        );
        let token = jwt.generate_token(1, "access").unwrap();

        assert!(matches!(
            jwt.verify_token(&token, "access"),
            Err(ServiceError::TokenExpired)
        ));
    }

    #[test]
    fn unknown_token_type_is_rejected() {
        let jwt = JwtConfig::new("test-secret");
        assert!(matches!(
            jwt.generate_token(1, "session"),
            Err(ServiceError::InvalidTokenType)
        ));
    }
}
