//! Expiry Sweeper Task
//!
//! Background task that periodically sweeps expired cache entries.
//!
//! The sweeper is started explicitly by whoever owns the cache's lifetime
//! and stopped through its handle before the cache is discarded. A failed
//! tick is logged and the schedule continues at the next interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::cache::{CacheKey, LruCache};

// == Sweeper Handle ==
/// Stop/join handle for a running sweeper task.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    // == Stop ==
    /// Signals the sweeper to stop and waits for it to finish.
    ///
    /// An in-flight tick is allowed to complete; no further ticks are
    /// scheduled.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }

    // == Is Finished ==
    /// Whether the task has already exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

// == Spawn Sweeper ==
/// Spawns a background task that calls `sweep_expired` on a fixed interval.
///
/// # Arguments
/// * `cache` - shared cache instance to sweep
/// * `interval` - time between sweep ticks
///
/// # Example
/// ```ignore
/// let cache = Arc::new(LruCache::new(1000)?);
/// let sweeper = spawn_sweeper(cache.clone(), Duration::from_secs(20));
/// // Later, during shutdown:
/// sweeper.stop().await;
/// ```
pub fn spawn_sweeper<K, V>(cache: Arc<LruCache<K, V>>, interval: Duration) -> SweeperHandle
where
    K: CacheKey,
    V: Clone + Send + Sync + 'static,
{
    let (shutdown, mut shutdown_rx) = watch::channel(false);
    let logger = cache.logger();

    let handle = tokio::spawn(async move {
        logger.info(&format!(
            "starting expiry sweeper with interval {:?}",
            interval
        ));

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval fires immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match cache.sweep_expired().await {
                        Ok(0) => debug!("expiry sweep: no expired entries found"),
                        Ok(removed) => logger.info(&format!(
                            "expiry sweep: removed {} expired entries",
                            removed
                        )),
                        // A failed tick never terminates the loop
                        Err(e) => logger.warn(&format!("expiry sweep tick failed: {}", e)),
                    }
                }
                _ = shutdown_rx.changed() => {
                    logger.info("expiry sweeper stopping");
                    break;
                }
            }
        }
    });

    SweeperHandle { shutdown, handle }
}
