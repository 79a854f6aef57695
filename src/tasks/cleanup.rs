//! TTL Cleanup Task
//!
//! Periodically removes expired entries from every local cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::LocalCacheManager;

/// Spawns the sweep loop. Abort the returned handle to stop it.
///
/// # Example
/// ```ignore
/// let caches = Arc::new(LocalCacheManager::new());
/// let cleanup_handle = spawn_cleanup_task(caches.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    caches: Arc<LocalCacheManager>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = caches.cleanup_expired().await;
            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
