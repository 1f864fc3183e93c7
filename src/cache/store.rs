//! Cache Store Module
//!
//! Single-threaded cache core combining HashMap storage with recency
//! tracking and per-entry expiration.
//!
//! The entry map and the recency tracker form one consistency unit: every
//! mutation keeps their key sets identical, and a divergence surfaces as
//! `CacheError::Internal`. The store never fires eviction callbacks itself;
//! it hands committed `Eviction` records back to the engine, which notifies
//! subscribers outside the critical section.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::cache::{
    CacheEntry, CacheKey, CacheStats, Eviction, EvictionReason, ExpirationPolicy, RecencyTracker,
};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Cache core with LRU eviction and expiration support.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Recency order (front = LRU, back = MRU)
    lru: RecencyTracker<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K: CacheKey, V: Clone> CacheStore<K, V> {
    // == Constructor ==
    /// Creates a store holding at most `capacity` entries.
    ///
    /// A capacity of zero is rejected with `InvalidCapacity`.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        Ok(Self {
            entries: HashMap::new(),
            lru: RecencyTracker::new(),
            stats: CacheStats::new(),
            capacity,
        })
    }

    fn validate_key(key: &K) -> Result<()> {
        match key.validate() {
            Some(defect) => Err(CacheError::InvalidKey(defect)),
            None => Ok(()),
        }
    }

    // == Get ==
    /// Retrieves a value by key, evaluated at `now`.
    ///
    /// The expiry check happens before any recency update: an entry whose
    /// deadline has passed is removed, counted as a miss, and reported as an
    /// `Expired` eviction. A live entry is moved to the MRU position, has its
    /// sliding deadline renewed, and counts as a hit.
    ///
    /// Returns the value (None when absent or expired) together with the
    /// eviction, if any, for the engine to deliver.
    pub fn get(
        &mut self,
        key: &K,
        now: DateTime<Utc>,
    ) -> Result<(Option<V>, Option<Eviction<K>>)> {
        Self::validate_key(key)?;

        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return Ok((None, None));
        };

        if entry.is_expired_at(now) {
            let eviction = self.remove_committed(key, EvictionReason::Expired)?;
            self.stats.record_expired_eviction();
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            return Ok((None, Some(eviction)));
        }

        entry.touch(now)?;
        let value = entry.value.clone();
        self.lru.touch(key);
        self.stats.record_hit();
        Ok((Some(value), None))
    }

    // == Put ==
    /// Stores a key-value pair under the given policy.
    ///
    /// Overwriting an existing key replaces its value and policy, recomputes
    /// the deadline as if newly inserted, and moves the key to the MRU
    /// position; the entry count is unchanged and nothing is evicted.
    ///
    /// A fresh insert that pushes the store over capacity evicts exactly the
    /// LRU entry, reported back as a `CapacityExceeded` eviction.
    pub fn put(
        &mut self,
        key: K,
        value: V,
        policy: ExpirationPolicy,
        now: DateTime<Utc>,
    ) -> Result<Option<Eviction<K>>> {
        Self::validate_key(&key)?;
        // Validates the policy before any state changes
        let entry = CacheEntry::new(value, policy, now)?;

        let is_overwrite = self.entries.insert(key.clone(), entry).is_some();
        self.lru.touch(&key);

        let eviction = if !is_overwrite && self.entries.len() > self.capacity {
            let evicted = self
                .lru
                .evict_front()
                .ok_or_else(|| CacheError::Internal("tracker empty while over capacity".into()))?;
            if self.entries.remove(&evicted).is_none() {
                return Err(CacheError::Internal(format!(
                    "tracker key {:?} missing from entry map",
                    evicted
                )));
            }
            self.stats.record_capacity_eviction();
            Some(Eviction {
                key: evicted,
                reason: EvictionReason::CapacityExceeded,
            })
        } else {
            None
        };

        self.stats.set_total_entries(self.entries.len());
        Ok(eviction)
    }

    // == Remove ==
    /// Deletes an entry by key.
    ///
    /// This is a caller-initiated removal, not an eviction: no notification
    /// is produced. Returns the removed key, or None if it was absent.
    pub fn remove(&mut self, key: &K) -> Result<Option<K>> {
        Self::validate_key(key)?;

        let Some((removed_key, _)) = self.entries.remove_entry(key) else {
            return Ok(None);
        };
        if !self.lru.remove(key) {
            return Err(CacheError::Internal(format!(
                "map key {:?} missing from recency tracker",
                key
            )));
        }
        self.stats.set_total_entries(self.entries.len());
        Ok(Some(removed_key))
    }

    // == Clear ==
    /// Empties the map and the tracker. A bulk reset, not an eviction: no
    /// per-key notifications are produced and hit/miss counters keep their
    /// values.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Sweep Expired ==
    /// Removes every entry whose deadline has passed as of `now`.
    ///
    /// Entries are judged at a single scan instant, without the sliding
    /// renewal that `get` performs. Returns one `Expired` eviction per
    /// removed entry, in no particular order.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> Result<Vec<Eviction<K>>> {
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        let mut evictions = Vec::with_capacity(expired_keys.len());
        for key in expired_keys {
            let eviction = self.remove_committed(&key, EvictionReason::Expired)?;
            self.stats.record_expired_eviction();
            evictions.push(eviction);
        }

        self.stats.set_total_entries(self.entries.len());
        Ok(evictions)
    }

    /// Removes an entry known to exist from both structures.
    fn remove_committed(&mut self, key: &K, reason: EvictionReason) -> Result<Eviction<K>> {
        let Some((removed_key, _)) = self.entries.remove_entry(key) else {
            return Err(CacheError::Internal(format!(
                "expected key {:?} missing from entry map",
                key
            )));
        };
        if !self.lru.remove(key) {
            return Err(CacheError::Internal(format!(
                "map key {:?} missing from recency tracker",
                key
            )));
        }
        Ok(Eviction {
            key: removed_key,
            reason,
        })
    }

    // == Stats ==
    /// Returns a statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Capacity ==
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Checks that the map and the tracker hold exactly the same keys and
    /// that the capacity bound holds. Test support.
    #[cfg(test)]
    pub fn check_invariants(&self) -> bool {
        self.entries.len() == self.lru.len()
            && self.entries.len() <= self.capacity
            && self.lru.iter().all(|key| self.entries.contains_key(key))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use std::time::Duration;

    fn store(capacity: usize) -> CacheStore<String, String> {
        CacheStore::new(capacity).unwrap()
    }

    fn put_plain(store: &mut CacheStore<String, String>, key: &str, value: &str) {
        store
            .put(
                key.to_string(),
                value.to_string(),
                ExpirationPolicy::NoExpiration,
                Utc::now(),
            )
            .unwrap();
    }

    #[test]
    fn test_store_new() {
        let store = store(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
    }

    #[test]
    fn test_store_zero_capacity_rejected() {
        let result: Result<CacheStore<String, String>> = CacheStore::new(0);
        assert!(matches!(result, Err(CacheError::InvalidCapacity(0))));
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = store(100);
        put_plain(&mut store, "key1", "value1");

        let (value, eviction) = store.get(&"key1".to_string(), Utc::now()).unwrap();
        assert_eq!(value.as_deref(), Some("value1"));
        assert!(eviction.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_absent_is_a_plain_miss() {
        let mut store = store(100);

        let (value, eviction) = store.get(&"nope".to_string(), Utc::now()).unwrap();
        assert!(value.is_none());
        assert!(eviction.is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_invalid_key_rejected() {
        let mut store = store(100);

        let result = store.get(&String::new(), Utc::now());
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));

        let result = store.put(
            String::new(),
            "v".to_string(),
            ExpirationPolicy::NoExpiration,
            Utc::now(),
        );
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));
    }

    #[test]
    fn test_store_overwrite_keeps_size_and_replaces_value() {
        let mut store = store(100);
        put_plain(&mut store, "key1", "A");
        put_plain(&mut store, "key1", "C");

        let (value, _) = store.get(&"key1".to_string(), Utc::now()).unwrap();
        assert_eq!(value.as_deref(), Some("C"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_remove() {
        let mut store = store(100);
        put_plain(&mut store, "key1", "value1");

        let removed = store.remove(&"key1".to_string()).unwrap();
        assert_eq!(removed.as_deref(), Some("key1"));
        assert!(store.is_empty());

        let removed = store.remove(&"key1".to_string()).unwrap();
        assert!(removed.is_none());
    }

    #[test]
    fn test_store_capacity_eviction_removes_lru() {
        let mut store = store(3);
        put_plain(&mut store, "key1", "v1");
        put_plain(&mut store, "key2", "v2");
        put_plain(&mut store, "key3", "v3");

        let eviction = store
            .put(
                "key4".to_string(),
                "v4".to_string(),
                ExpirationPolicy::NoExpiration,
                Utc::now(),
            )
            .unwrap()
            .unwrap();

        assert_eq!(eviction.key, "key1");
        assert_eq!(eviction.reason, EvictionReason::CapacityExceeded);
        assert_eq!(store.len(), 3);
        assert_eq!(store.stats().capacity_evictions, 1);
    }

    #[test]
    fn test_store_get_refreshes_recency() {
        let mut store = store(3);
        put_plain(&mut store, "key1", "v1");
        put_plain(&mut store, "key2", "v2");
        put_plain(&mut store, "key3", "v3");

        // key1 becomes MRU, key2 becomes the eviction candidate
        store.get(&"key1".to_string(), Utc::now()).unwrap();

        let eviction = store
            .put(
                "key4".to_string(),
                "v4".to_string(),
                ExpirationPolicy::NoExpiration,
                Utc::now(),
            )
            .unwrap()
            .unwrap();

        assert_eq!(eviction.key, "key2");
    }

    #[test]
    fn test_store_overwrite_never_evicts() {
        let mut store = store(2);
        put_plain(&mut store, "key1", "v1");
        put_plain(&mut store, "key2", "v2");

        let eviction = store
            .put(
                "key1".to_string(),
                "v1b".to_string(),
                ExpirationPolicy::NoExpiration,
                Utc::now(),
            )
            .unwrap();

        assert!(eviction.is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_lazy_expiry_on_get() {
        let mut store = store(100);
        let now = Utc::now();
        store
            .put(
                "key1".to_string(),
                "v1".to_string(),
                ExpirationPolicy::Absolute(now + TimeDelta::seconds(10)),
                now,
            )
            .unwrap();

        let later = now + TimeDelta::seconds(11);
        let (value, eviction) = store.get(&"key1".to_string(), later).unwrap();

        assert!(value.is_none());
        let eviction = eviction.unwrap();
        assert_eq!(eviction.key, "key1");
        assert_eq!(eviction.reason, EvictionReason::Expired);
        assert!(store.is_empty());

        let stats = store.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expired_evictions, 1);
    }

    #[test]
    fn test_store_sliding_get_renews_deadline() {
        let mut store = store(100);
        let now = Utc::now();
        store
            .put(
                "key1".to_string(),
                "v1".to_string(),
                ExpirationPolicy::Sliding(Duration::from_secs(60)),
                now,
            )
            .unwrap();

        // Read 45 s in: inside the window, renews the lease
        let touch = now + TimeDelta::seconds(45);
        let (value, _) = store.get(&"key1".to_string(), touch).unwrap();
        assert!(value.is_some());

        // 90 s after insert would have expired the original deadline, but the
        // renewed one runs to touch + 60 s
        let still_live = now + TimeDelta::seconds(90);
        let (value, _) = store.get(&"key1".to_string(), still_live).unwrap();
        assert!(value.is_some());
    }

    #[test]
    fn test_store_unread_sliding_entry_expires() {
        let mut store = store(100);
        let now = Utc::now();
        store
            .put(
                "idle".to_string(),
                "v".to_string(),
                ExpirationPolicy::Sliding(Duration::from_secs(60)),
                now,
            )
            .unwrap();

        // No reads for the full window: eligible for the sweep at the
        // deadline instant
        let evictions = store.sweep_expired(now + TimeDelta::seconds(60)).unwrap();
        assert_eq!(evictions.len(), 1);
        assert_eq!(evictions[0].key, "idle");
        assert_eq!(evictions[0].reason, EvictionReason::Expired);
        assert!(store.is_empty());
        assert_eq!(store.stats().expired_evictions, 1);
    }

    #[test]
    fn test_store_unread_sliding_entry_reclaimed_lazily() {
        let mut store = store(100);
        let now = Utc::now();
        store
            .put(
                "idle".to_string(),
                "v".to_string(),
                ExpirationPolicy::Sliding(Duration::from_secs(60)),
                now,
            )
            .unwrap();

        // First read after the window: the lease was never renewed
        let (value, eviction) = store
            .get(&"idle".to_string(), now + TimeDelta::seconds(61))
            .unwrap();

        assert!(value.is_none());
        let eviction = eviction.unwrap();
        assert_eq!(eviction.key, "idle");
        assert_eq!(eviction.reason, EvictionReason::Expired);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_absolute_deadline_ignores_reads() {
        let mut store = store(100);
        let now = Utc::now();
        store
            .put(
                "key1".to_string(),
                "v1".to_string(),
                ExpirationPolicy::Absolute(now + TimeDelta::seconds(30)),
                now,
            )
            .unwrap();

        // Reads before the deadline do not extend it
        store.get(&"key1".to_string(), now + TimeDelta::seconds(29)).unwrap();

        let (value, eviction) = store
            .get(&"key1".to_string(), now + TimeDelta::seconds(30))
            .unwrap();
        assert!(value.is_none());
        assert!(eviction.is_some());
    }

    #[test]
    fn test_store_sweep_removes_all_and_only_expired() {
        let mut store = store(100);
        let now = Utc::now();
        store
            .put(
                "soon".to_string(),
                "v".to_string(),
                ExpirationPolicy::Absolute(now + TimeDelta::seconds(1)),
                now,
            )
            .unwrap();
        store
            .put(
                "later".to_string(),
                "v".to_string(),
                ExpirationPolicy::Absolute(now + TimeDelta::seconds(100)),
                now,
            )
            .unwrap();
        put_plain(&mut store, "forever", "v");

        let evictions = store.sweep_expired(now + TimeDelta::seconds(2)).unwrap();

        assert_eq!(evictions.len(), 1);
        assert_eq!(evictions[0].key, "soon");
        assert_eq!(evictions[0].reason, EvictionReason::Expired);
        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().expired_evictions, 1);
    }

    #[test]
    fn test_store_sweep_never_matches_no_expiration() {
        let mut store = store(100);
        put_plain(&mut store, "a", "v");
        put_plain(&mut store, "b", "v");

        let evictions = store
            .sweep_expired(Utc::now() + TimeDelta::days(3650))
            .unwrap();

        assert!(evictions.is_empty());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_clear() {
        let mut store = store(100);
        put_plain(&mut store, "a", "v");
        put_plain(&mut store, "b", "v");

        store.clear();

        assert!(store.is_empty());
        assert!(store.check_invariants());
        // Counters survive a clear
        let (value, _) = store.get(&"a".to_string(), Utc::now()).unwrap();
        assert!(value.is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_stats_snapshot() {
        let mut store = store(100);
        put_plain(&mut store, "key1", "v1");

        store.get(&"key1".to_string(), Utc::now()).unwrap(); // hit
        store.get(&"ghost".to_string(), Utc::now()).unwrap(); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_store_invariants_after_mixed_operations() {
        let mut store = store(4);
        for i in 0..10 {
            put_plain(&mut store, &format!("key{i}"), "v");
            assert!(store.check_invariants());
        }
        store.remove(&"key9".to_string()).unwrap();
        assert!(store.check_invariants());
        store.get(&"key8".to_string(), Utc::now()).unwrap();
        assert!(store.check_invariants());
    }
}
