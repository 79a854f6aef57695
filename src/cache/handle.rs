//! Cache collaborator interfaces
//!
//! The distributed cache backend is reached only through these traits.

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::CacheSpec;
use crate::error::Result;

// == Cache Handle ==
/// A named, shared cache. Values are opaque strings (JSON for typed records).
///
/// Implementations must be safe for concurrent `get`/`put` from many tasks.
#[async_trait]
pub trait CacheHandle: Send + Sync {
    /// Name the handle was registered under.
    fn name(&self) -> &str;

    /// Returns the live value for `key`, or `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` with the cache's TTL.
    async fn put(&self, key: &str, value: String) -> Result<()>;
}

// == Cache Manager ==
/// Obtains or creates named caches.
#[async_trait]
pub trait CacheManager: Send + Sync {
    /// Returns the cache registered as `name`, creating it from `spec` if needed.
    async fn get_or_create(&self, name: &str, spec: &CacheSpec) -> Result<Arc<dyn CacheHandle>>;
}
