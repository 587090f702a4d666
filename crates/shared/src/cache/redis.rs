use crate::{abstract_trait::CacheBackendTrait, errors::ServiceError};
use async_trait::async_trait;
use deadpool_redis::{Connection, Pool};
use std::{collections::BTreeMap, time::Duration};
use tracing::{debug, error};

const INFO_FIELDS: [&str; 8] = [
    "redis_version",
    "connected_clients",
    "used_memory",
    "used_memory_human",
    "total_commands_processed",
    "keyspace_hits",
    "keyspace_misses",
    "uptime_in_seconds",
];

#[derive(Clone)]
pub struct RedisCacheBackend {
    pool: Pool,
}

impl RedisCacheBackend {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<Connection, ServiceError> {
        self.pool.get().await.map_err(|e| {
            error!("Failed to get Redis connection: {:?}", e);
            ServiceError::Internal(format!("Redis unavailable: {e}"))
        })
    }
}

fn redis_error(e: redis::RedisError) -> ServiceError {
    ServiceError::Internal(format!("Redis error: {e}"))
}

#[async_trait]
impl CacheBackendTrait for RedisCacheBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let mut conn = self.conn().await?;
        redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(redis_error)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), ServiceError> {
        let mut conn = self.conn().await?;
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<()>(&mut conn)
            .await
            .map_err(redis_error)
    }

    async fn delete(&self, key: &str) -> Result<(), ServiceError> {
        let mut conn = self.conn().await?;
        redis::cmd("DEL")
            .arg(key)
            .query_async::<()>(&mut conn)
            .await
            .map_err(redis_error)
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, ServiceError> {
        let mut conn = self.conn().await?;
        let mut cursor: u64 = 0;
        let mut removed: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(200)
                .query_async(&mut conn)
                .await
                .map_err(redis_error)?;

            if !keys.is_empty() {
                let deleted: u64 = redis::cmd("DEL")
                    .arg(&keys)
                    .query_async(&mut conn)
                    .await
                    .map_err(redis_error)?;
                removed += deleted;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!("Redis removed {removed} keys for '{pattern}'");

        Ok(removed)
    }

    async fn incr(&self, key: &str, ttl: Duration) -> Result<i64, ServiceError> {
        let mut conn = self.conn().await?;
        let count: i64 = redis::cmd("INCR")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(redis_error)?;

        if count == 1 {
            redis::cmd("EXPIRE")
                .arg(key)
                .arg(ttl.as_secs().max(1))
                .query_async::<()>(&mut conn)
                .await
                .map_err(redis_error)?;
        }

        Ok(count)
    }

    async fn clear(&self) -> Result<(), ServiceError> {
        let mut conn = self.conn().await?;
        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await
            .map_err(redis_error)
    }

    async fn stats(&self) -> Result<BTreeMap<String, String>, ServiceError> {
        let mut conn = self.conn().await?;
        let info: String = redis::cmd("INFO")
            .query_async(&mut conn)
            .await
            .map_err(redis_error)?;

        let mut stats = parse_info(&info);
        stats.retain(|key, _| INFO_FIELDS.contains(&key.as_str()) || key.starts_with("db"));
        Ok(stats)
    }
}

/// Parses the `key:value` lines of a Redis `INFO` reply, skipping section headers.
pub fn parse_info(info: &str) -> BTreeMap<String, String> {
    info.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
