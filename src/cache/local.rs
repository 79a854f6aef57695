//! Local Cache Backend
//!
//! In-process [`CacheManager`] used when no distributed backend is wired in.
//! Each named cache is a [`CacheStore`] behind a tokio `RwLock`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{CacheHandle, CacheManager, CacheSpec, CacheStats, CacheStore};
use crate::error::Result;

// == Local Cache ==
pub struct LocalCache {
    name: String,
    spec: CacheSpec,
    store: RwLock<CacheStore>,
}

impl LocalCache {
    pub fn new(name: impl Into<String>, spec: CacheSpec) -> Self {
        let store = CacheStore::new(spec.max_entries(), spec.ttl());
        Self {
            name: name.into(),
            spec,
            store: RwLock::new(store),
        }
    }

    pub fn spec(&self) -> &CacheSpec {
        &self.spec
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn remove(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    pub async fn cleanup_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }
}

#[async_trait]
impl CacheHandle for LocalCache {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        // write lock: a read updates recency and stats
        Ok(self.store.write().await.get(key))
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        self.store.write().await.set(key.to_string(), value);
        Ok(())
    }
}

// == Local Cache Manager ==
#[derive(Default)]
pub struct LocalCacheManager {
    caches: RwLock<HashMap<String, Arc<LocalCache>>>,
}

impl LocalCacheManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the concrete cache registered as `name`.
    pub async fn cache(&self, name: &str) -> Option<Arc<LocalCache>> {
        self.caches.read().await.get(name).cloned()
    }

    /// Stats for every registered cache, sorted by name.
    pub async fn snapshot(&self) -> Vec<(String, CacheStats)> {
        let caches: Vec<Arc<LocalCache>> = self.caches.read().await.values().cloned().collect();

        let mut snapshot = Vec::with_capacity(caches.len());
        for cache in caches {
            snapshot.push((cache.name.clone(), cache.stats().await));
        }
        snapshot.sort_by(|a, b| a.0.cmp(&b.0));
        snapshot
    }

    /// Sweeps expired entries from every cache. Returns the total removed.
    pub async fn cleanup_expired(&self) -> usize {
        let caches: Vec<Arc<LocalCache>> = self.caches.read().await.values().cloned().collect();

        let mut removed = 0;
        for cache in caches {
            removed += cache.cleanup_expired().await;
        }
        removed
    }
}

#[async_trait]
impl CacheManager for LocalCacheManager {
    async fn get_or_create(&self, name: &str, spec: &CacheSpec) -> Result<Arc<dyn CacheHandle>> {
        let mut caches = self.caches.write().await;
        if let Some(existing) = caches.get(name) {
            debug!(cache = name, "Reusing local cache");
            let handle: Arc<dyn CacheHandle> = existing.clone();
            return Ok(handle);
        }

        let cache = Arc::new(LocalCache::new(name, spec.clone()));
        caches.insert(name.to_string(), cache.clone());
        info!(
            cache = name,
            max_entries = spec.max_entries(),
            ttl_ms = spec.ttl().as_millis() as u64,
            "Local cache created"
        );
        Ok(cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn spec(ttl: Duration) -> CacheSpec {
        CacheSpec::new("prefix", 10, ttl, "redis://default:p@a:1?clientName=t").unwrap()
    }

    #[tokio::test]
    async fn test_get_or_create_returns_same_cache() {
        let manager = LocalCacheManager::new();
        let spec = spec(Duration::from_secs(60));

        let first = manager.get_or_create("c", &spec).await.unwrap();
        first.put("k", "v".to_string()).await.unwrap();
        let second = manager.get_or_create("c", &spec).await.unwrap();

        assert_eq!(second.get("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(manager.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_reports_stats() {
        let manager = LocalCacheManager::new();
        let cache = manager
            .get_or_create("c", &spec(Duration::from_secs(60)))
            .await
            .unwrap();

        cache.put("k", "v".to_string()).await.unwrap();
        cache.get("k").await.unwrap();
        cache.get("other").await.unwrap();

        let snapshot = manager.snapshot().await;
        assert_eq!(snapshot[0].0, "c");
        assert_eq!(snapshot[0].1.hits, 1);
        assert_eq!(snapshot[0].1.misses, 1);
        assert_eq!(snapshot[0].1.total_entries, 1);
    }

    #[tokio::test]
    async fn test_cleanup_expired_across_caches() {
        let manager = LocalCacheManager::new();
        let short = spec(Duration::from_millis(20));
        let a = manager.get_or_create("a", &short).await.unwrap();
        let b = manager.get_or_create("b", &short).await.unwrap();
        a.put("k", "v".to_string()).await.unwrap();
        b.put("k", "v".to_string()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(manager.cleanup_expired().await, 2);
    }

    #[tokio::test]
    async fn test_remove_entry() {
        let manager = LocalCacheManager::new();
        manager
            .get_or_create("c", &spec(Duration::from_secs(60)))
            .await
            .unwrap()
            .put("k", "v".to_string())
            .await
            .unwrap();

        let cache = manager.cache("c").await.unwrap();
        assert!(cache.remove("k").await);
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert_eq!(cache.spec().max_entries(), 10);
    }
}
