use crate::{abstract_trait::CacheBackendTrait, errors::ServiceError};
use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};
use tracing::debug;

#[derive(Clone, Debug)]
struct Entry {
    value: String,
    ttl: Duration,
    keep_ttl: bool,
}

/// Each entry carries its own TTL; counters keep the expiry they were created with.
struct PerEntryExpiry;

impl Expiry<String, Entry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        if value.keep_ttl {
            duration_until_expiry
        } else {
            Some(value.ttl)
        }
    }
}

/// In-process cache for single-instance deployments and tests.
#[derive(Clone)]
pub struct MemoryCacheBackend {
    cache: Cache<String, Entry>,
}

impl MemoryCacheBackend {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        Self { cache }
    }
}

impl Default for MemoryCacheBackend {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CacheBackendTrait for MemoryCacheBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), ServiceError> {
        self.cache
            .insert(
                key.to_string(),
                Entry {
                    value,
                    ttl,
                    keep_ttl: false,
                },
            )
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), ServiceError> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, ServiceError> {
        let matching: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| glob_match(pattern, key.as_str()))
            .map(|(key, _)| key.to_string())
            .collect();

        for key in &matching {
            self.cache.invalidate(key.as_str()).await;
        }

        debug!("Memory cache removed {} keys for '{}'", matching.len(), pattern);

        Ok(matching.len() as u64)
    }

    async fn incr(&self, key: &str, ttl: Duration) -> Result<i64, ServiceError> {
        let entry = self
            .cache
            .entry(key.to_string())
            .and_upsert_with(|existing| {
                let next = match existing {
                    Some(entry) => Entry {
                        value: (entry.value().value.parse::<i64>().unwrap_or(0) + 1).to_string(),
                        ttl,
                        keep_ttl: true,
                    },
                    None => Entry {
                        value: "1".to_string(),
                        ttl,
                        keep_ttl: false,
                    },
                };
                std::future::ready(next)
            })
            .await;

        entry
            .value()
            .value
            .parse::<i64>()
            .map_err(|e| ServiceError::Internal(format!("Counter '{key}' is not numeric: {e}")))
    }

    async fn clear(&self) -> Result<(), ServiceError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn stats(&self) -> Result<BTreeMap<String, String>, ServiceError> {
        self.cache.run_pending_tasks().await;

        let mut stats = BTreeMap::new();
        stats.insert("entries".to_string(), self.cache.entry_count().to_string());
        if let Some(capacity) = self.cache.policy().max_capacity() {
            stats.insert("max_capacity".to_string(), capacity.to_string());
        }
        Ok(stats)
    }
}

/// Redis-style glob matching limited to `*` and `?`.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut star: Option<usize> = None;
    let mut resume = 0;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            resume = t;
            p += 1;
        } else if let Some(star_at) = star {
            p = star_at + 1;
            resume += 1;
            t = resume;
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }

    p == pattern.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_matching() {
        assert!(glob_match("*public_products*", "public_products:list:{}"));
        assert!(glob_match("session:*", "session:12"));
        assert!(glob_match("product_detail_?", "product_detail_7"));
        assert!(!glob_match("product_detail_?", "product_detail_17"));
        assert!(!glob_match("*categories_list*", "public_products:list:{}"));
        assert!(glob_match("*", ""));
    }

    #[tokio::test]
    async fn set_get_delete() {
        let backend = MemoryCacheBackend::default();
        backend
            .set("greeting", "hello".into(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(backend.get("greeting").await.unwrap(), Some("hello".into()));

        backend.delete("greeting").await.unwrap();
        assert_eq!(backend.get("greeting").await.unwrap(), None);
    }

    #[tokio::test]
    async fn entries_expire() {
        let backend = MemoryCacheBackend::default();
        backend
            .set("short", "lived".into(), Duration::from_millis(50))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(backend.get("short").await.unwrap(), None);
    }

    #[tokio::test]
    async fn pattern_delete_counts_removed_keys() {
        let backend = MemoryCacheBackend::default();
        for key in ["public_products:list:a", "public_products:list:b", "session:1"] {
            backend
                .set(key, "x".into(), Duration::from_secs(60))
                .await
                .unwrap();
        }

        let removed = backend.delete_pattern("*public_products*").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(backend.get("session:1").await.unwrap(), Some("x".into()));
    }

    #[tokio::test]
    async fn counters_and_clear() {
        let backend = MemoryCacheBackend::default();
        let ttl = Duration::from_secs(60);

        assert_eq!(backend.incr("attempts", ttl).await.unwrap(), 1);
        assert_eq!(backend.incr("attempts", ttl).await.unwrap(), 2);
        assert_eq!(backend.incr("attempts", ttl).await.unwrap(), 3);

        backend.clear().await.unwrap();
        assert_eq!(backend.get("attempts").await.unwrap(), None);

        let stats = backend.stats().await.unwrap();
        assert_eq!(stats.get("entries").map(String::as_str), Some("0"));
    }
}
