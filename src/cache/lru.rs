//! Recency Tracker Module
//!
//! Ordered key sequence backing the least-recently-used eviction order.

use std::collections::{HashMap, VecDeque};

use crate::cache::CacheKey;

// == Recency Tracker ==
/// Tracks access order for LRU eviction.
///
/// Every touch pushes a freshly stamped `(sequence, key)` pair onto the back
/// of the deque and records the stamp in `live`; older pairs for the same key
/// become stale and are skipped lazily when the front is consumed. Touch,
/// remove, and evict are therefore amortized O(1) instead of rescanning the
/// deque on every access.
///
/// - Front = Least recently used
/// - Back = Most recently used
#[derive(Debug)]
pub struct RecencyTracker<K> {
    /// Stamped touches, oldest first; entries whose stamp no longer matches
    /// `live` are stale
    order: VecDeque<(u64, K)>,
    /// Latest stamp per live key
    live: HashMap<K, u64>,
    /// Next stamp to hand out
    next_seq: u64,
}

impl<K: CacheKey> RecencyTracker<K> {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
            live: HashMap::new(),
            next_seq: 0,
        }
    }

    // == Touch ==
    /// Marks a key as most recently used (moves to back).
    ///
    /// A previously tracked key keeps its old deque pair as a stale
    /// tombstone; only the new stamp counts.
    pub fn touch(&mut self, key: &K) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.live.insert(key.clone(), seq);
        self.order.push_back((seq, key.clone()));
        self.compact_if_needed();
    }

    // == Remove ==
    /// Removes a key from the tracker. Returns whether it was present.
    ///
    /// The key's deque pair is left behind as a stale tombstone and dropped
    /// when it reaches the front or the next compaction.
    pub fn remove(&mut self, key: &K) -> bool {
        self.live.remove(key).is_some()
    }

    // == Evict Front ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if the tracker is empty.
    pub fn evict_front(&mut self) -> Option<K> {
        while let Some((seq, key)) = self.order.pop_front() {
            if self.live.get(&key) == Some(&seq) {
                self.live.remove(&key);
                return Some(key);
            }
            // Stale pair of a re-touched or removed key
        }
        None
    }

    // == Peek Front ==
    /// Returns the least recently used key without removing it, discarding
    /// stale front pairs along the way.
    pub fn peek_front(&mut self) -> Option<&K> {
        while let Some((seq, key)) = self.order.front() {
            if self.live.get(key) == Some(seq) {
                break;
            }
            self.order.pop_front();
        }
        self.order.front().map(|(_, key)| key)
    }

    // == Clear ==
    /// Drops every tracked key.
    pub fn clear(&mut self) {
        self.order.clear();
        self.live.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.live.contains_key(key)
    }

    // == Iter ==
    /// Iterates live keys from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.order
            .iter()
            .filter(|(seq, key)| self.live.get(key) == Some(seq))
            .map(|(_, key)| key)
    }

    /// Rebuilds the deque once stale pairs outnumber live ones, keeping the
    /// deque length within a constant factor of the live key count.
    fn compact_if_needed(&mut self) {
        if self.order.len() < self.live.len() * 2 + 8 {
            return;
        }
        let live = &self.live;
        self.order.retain(|(seq, key)| live.get(key) == Some(seq));
    }

    /// Deque length including stale pairs. Test support for the compaction
    /// bound.
    #[cfg(test)]
    fn queue_len(&self) -> usize {
        self.order.len()
    }
}

impl<K: CacheKey> Default for RecencyTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}
