//! Expiry Purge Task
//!
//! Background task that periodically sweeps expired entries out of an
//! [`ExpiringCache`].
//!
//! Reads already purge what they touch; this task reclaims entries nobody
//! reads anymore, plus deadlines of keys the base cache evicted on its own.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{BaseCache, ExpiringCache};

/// Shortest accepted interval between sweeps.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Spawns a background task that periodically purges expired cache entries.
///
/// The task runs until its handle is aborted, sleeping `interval` between
/// sweeps. Must be called from within a tokio runtime.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(ExpiringCache::new(1000, Duration::from_secs(300))?);
/// let purge_handle = spawn_purge_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// purge_handle.abort();
/// ```
pub fn spawn_purge_task<K, V, B>(
    cache: Arc<ExpiringCache<K, V, B>>,
    interval: Duration,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: 'static,
    B: BaseCache<K, V> + Send + Sync + 'static,
{
    let interval = interval.max(MIN_INTERVAL);

    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting expiry purge task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired();

            if removed > 0 {
                info!("Expiry purge: removed {} expired entries", removed);
            } else {
                debug!("Expiry purge: no expired entries found");
            }
        }
    })
}
