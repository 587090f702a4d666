use crate::config::RedisConfig;
use anyhow::{Context, Result, anyhow};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackendKind {
    Redis,
    Memory,
}

impl CacheBackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBackendKind::Redis => "redis",
            CacheBackendKind::Memory => "memory",
        }
    }
}

impl FromStr for CacheBackendKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackendKind::Redis),
            "memory" | "locmem" => Ok(CacheBackendKind::Memory),
            other => Err(anyhow!(
                "CACHE_BACKEND must be 'redis' or 'memory', got '{}'",
                other
            )),
        }
    }
}

/// Credentials for the administrator account created at start-up when it
/// does not exist yet.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub run_migrations: bool,
    pub port: u16,
    pub db_max_connections: u32,
    pub redis: RedisConfig,
    pub cache_backend: CacheBackendKind,
    pub cache_ttl_seconds: i64,
    pub otel_endpoint: String,
    pub bcrypt_cost: u32,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub is_dev: bool,
    pub enable_file_log: bool,
    pub admin: Option<AdminBootstrap>,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;
        let jwt_secret =
            std::env::var("JWT_SECRET").context("Missing environment variable: JWT_SECRET")?;
        let run_migrations_str = std::env::var("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;
        let port_str = std::env::var("PORT").context("Missing environment variable: PORT")?;

        let run_migrations = parse_bool("RUN_MIGRATIONS", &run_migrations_str)?;

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let redis = RedisConfig::new(
            env_or("REDIS_HOST", "127.0.0.1".to_string())?,
            env_or("REDIS_PORT", 6379)?,
            env_or("REDIS_DB", 0)?,
            std::env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty()),
        );

        let cache_backend = env_or("CACHE_BACKEND", CacheBackendKind::Redis)?;

        let admin = match (
            std::env::var("ADMIN_USERNAME"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
                Some(AdminBootstrap {
                    username,
                    password,
                    email: std::env::var("ADMIN_EMAIL").unwrap_or_default(),
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            run_migrations,
            port,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
            redis,
            cache_backend,
            cache_ttl_seconds: env_or("CACHE_TTL_SECONDS", 3600)?,
            otel_endpoint: env_or(
                "OTEL_ENDPOINT",
                "http://otel-collector:4317".to_string(),
            )?,
            bcrypt_cost: env_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            access_token_minutes: env_or("ACCESS_TOKEN_MINUTES", 60)?,
            refresh_token_days: env_or("REFRESH_TOKEN_DAYS", 7)?,
            is_dev: flag("DEV_MODE"),
            enable_file_log: flag("ENABLE_FILE_LOG"),
            admin,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(anyhow!("{} must be 'true' or 'false', got '{}'", key, other)),
    }
}

fn flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{} has an invalid value '{}': {}", key, raw, e)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_strict_booleans() {
        assert!(parse_bool("RUN_MIGRATIONS", "true").unwrap());
        assert!(!parse_bool("RUN_MIGRATIONS", "false").unwrap());
        assert!(parse_bool("RUN_MIGRATIONS", "yes").is_err());
    }

    #[test]
    fn parses_cache_backend() {
        assert_eq!(
            "Redis".parse::<CacheBackendKind>().unwrap(),
            CacheBackendKind::Redis
        );
        assert_eq!(
            "memory".parse::<CacheBackendKind>().unwrap(),
            CacheBackendKind::Memory
        );
        assert!("memcached".parse::<CacheBackendKind>().is_err());
    }

    #[test]
    fn env_or_falls_back_when_unset() {
        let value: u32 = env_or("STOREFRONT_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
