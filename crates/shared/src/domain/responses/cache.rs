use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CacheStatsResponse {
    pub cache_backend: String,
    pub cache_timeout: i64,
    pub cache_stats: BTreeMap<String, String>,
}

/// A read-through result together with whether it was served from cache.
#[derive(Debug, Clone)]
pub struct CacheLookup<T> {
    pub data: T,
    pub hit: bool,
}

impl<T> CacheLookup<T> {
    pub fn hit(data: T) -> Self {
        Self { data, hit: true }
    }

    pub fn miss(data: T) -> Self {
        Self { data, hit: false }
    }
}
