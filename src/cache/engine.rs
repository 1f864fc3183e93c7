//! Cache Engine Module
//!
//! Concurrency wrapper over the cache store: one exclusive critical section
//! guarding the map+tracker pair, the eviction notification funnel, and the
//! public async API.
//!
//! Eviction records are collected inside the critical section and delivered
//! after the write guard is dropped. A subscriber therefore observes the
//! removal already committed, and may call back into the cache without
//! deadlocking on the internal lock.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::cache::{
    CacheKey, CacheStats, CacheStore, EvictionNotifier, EvictionReason, ExpirationPolicy,
    SubscriptionId,
};
use crate::error::Result;
use crate::logger::{Logger, TracingLogger};

// == Lru Cache ==
/// Concurrent LRU cache with per-entry expiration.
///
/// A single instance may be shared by many callers behind an `Arc`; there is
/// no implicit global. Operations are linearized by the internal lock.
pub struct LruCache<K, V> {
    /// Map + tracker pair, guarded as one consistency unit
    store: RwLock<CacheStore<K, V>>,
    /// Subscribers for involuntary removals
    notifier: EvictionNotifier<K>,
    /// Injected log sink
    logger: Arc<dyn Logger>,
}

impl<K: CacheKey, V: Clone> LruCache<K, V> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries, logging through
    /// `tracing`.
    ///
    /// Rejects a zero capacity with `InvalidCapacity`.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_logger(capacity, Arc::new(TracingLogger))
    }

    // == Constructor With Logger ==
    /// Creates a cache with an injected logger.
    pub fn with_logger(capacity: usize, logger: Arc<dyn Logger>) -> Result<Self> {
        Ok(Self {
            store: RwLock::new(CacheStore::new(capacity)?),
            notifier: EvictionNotifier::new(),
            logger,
        })
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `Ok(None)` for an absent key. An entry found expired is
    /// removed, reported to subscribers with reason `Expired`, and counted as
    /// a miss. A live entry moves to the MRU position and, under a sliding
    /// policy, has its deadline renewed.
    pub async fn get(&self, key: &K) -> Result<Option<V>> {
        let (value, eviction) = {
            let mut store = self.store.write().await;
            store.get(key, Utc::now())?
        };

        if let Some(eviction) = &eviction {
            self.logger
                .info(&format!("cache entry expired on read: {:?}", eviction.key));
            self.notifier.notify(eviction, self.logger.as_ref());
        }
        match &value {
            Some(_) => self.logger.info(&format!("cache hit: {:?}", key)),
            None if eviction.is_none() => self.logger.info(&format!("cache miss: {:?}", key)),
            None => {}
        }

        Ok(value)
    }

    // == Put ==
    /// Stores a key-value pair that never expires.
    pub async fn put(&self, key: K, value: V) -> Result<()> {
        self.put_with_policy(key, value, ExpirationPolicy::NoExpiration)
            .await
    }

    // == Put With Policy ==
    /// Stores a key-value pair under an explicit expiration policy.
    ///
    /// Overwriting an existing key replaces value and policy without
    /// eviction. A fresh insert over capacity evicts the LRU entry and
    /// reports it to subscribers with reason `CapacityExceeded`.
    pub async fn put_with_policy(
        &self,
        key: K,
        value: V,
        policy: ExpirationPolicy,
    ) -> Result<()> {
        let eviction = {
            let mut store = self.store.write().await;
            store.put(key, value, policy, Utc::now())?
        };

        if let Some(eviction) = eviction {
            self.logger.info(&format!(
                "evicted {:?} ({})",
                eviction.key, eviction.reason
            ));
            self.notifier.notify(&eviction, self.logger.as_ref());
        }

        Ok(())
    }

    // == Remove ==
    /// Deletes an entry by key. Caller-initiated, so subscribers are not
    /// notified. Returns the removed key, or `Ok(None)` if absent.
    pub async fn remove(&self, key: &K) -> Result<Option<K>> {
        let removed = {
            let mut store = self.store.write().await;
            store.remove(key)?
        };

        if removed.is_none() {
            self.logger.info(&format!("key does not exist: {:?}", key));
        }

        Ok(removed)
    }

    // == Clear ==
    /// Empties the cache atomically. No per-key notifications.
    pub async fn clear(&self) -> Result<()> {
        let mut store = self.store.write().await;
        store.clear();
        Ok(())
    }

    // == Sweep Expired ==
    /// Removes every currently-expired entry, notifying subscribers once per
    /// entry. Returns the number of entries removed.
    pub async fn sweep_expired(&self) -> Result<usize> {
        let evictions = {
            let mut store = self.store.write().await;
            store.sweep_expired(Utc::now())?
        };

        for eviction in &evictions {
            self.logger
                .info(&format!("swept expired entry: {:?}", eviction.key));
            self.notifier.notify(eviction, self.logger.as_ref());
        }

        Ok(evictions.len())
    }

    // == Subscribe ==
    /// Registers an eviction subscriber, called with `(key, reason)` for
    /// every involuntary removal.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&K, EvictionReason) + Send + Sync + 'static,
    {
        self.notifier.subscribe(callback)
    }

    // == Unsubscribe ==
    /// Removes a previously registered subscriber.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// The injected log sink. The sweeper reports tick outcomes through
    /// this, so a host-supplied logger sees them too.
    pub(crate) fn logger(&self) -> Arc<dyn Logger> {
        self.logger.clone()
    }

    // == Stats ==
    /// Returns a snapshot of the hit/miss/eviction counters.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Length ==
    /// Returns the current number of live entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Capacity ==
    pub async fn capacity(&self) -> usize {
        self.store.read().await.capacity()
    }
}

impl<K: CacheKey, V> std::fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}
