mod keys;
mod memory;
mod redis;
mod store;

pub use self::keys::CacheKey;
pub use self::memory::{MemoryCacheBackend, glob_match};
pub use self::redis::{RedisCacheBackend, parse_info};
pub use self::store::CacheStore;
