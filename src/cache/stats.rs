//! Cache Statistics Module
//!
//! Tracks cache performance metrics: hits, misses, and evictions by reason.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance counters.
///
/// Hit and miss counters are monotonic since construction; `total_entries`
/// reflects the live entry count at snapshot time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key absent or expired)
    pub misses: u64,
    /// Entries evicted because an insert pushed the cache over capacity
    pub capacity_evictions: u64,
    /// Entries removed because their deadline passed (lazy check or sweep)
    pub expired_evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Evictions ==
    /// Total involuntary removals, regardless of reason.
    pub fn evictions(&self) -> u64 {
        self.capacity_evictions + self.expired_evictions
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Capacity Eviction ==
    pub fn record_capacity_eviction(&mut self) {
        self.capacity_evictions += 1;
    }

    // == Record Expired Eviction ==
    pub fn record_expired_eviction(&mut self) {
        self.expired_evictions += 1;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
