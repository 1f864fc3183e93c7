//! Eviction Events Module
//!
//! Callback registry notified whenever the engine removes an entry
//! involuntarily (capacity pressure or expiry).

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::cache::{CacheKey, EvictionReason};
use crate::logger::Logger;

// == Eviction Payload ==
/// A committed involuntary removal: which key, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eviction<K> {
    pub key: K,
    pub reason: EvictionReason,
}

// == Subscription Id ==
/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked for each eviction, in registration order.
pub type EvictionCallback<K> = Arc<dyn Fn(&K, EvictionReason) + Send + Sync>;

// == Eviction Notifier ==
/// Ordered registry of eviction subscribers.
///
/// Callbacks run synchronously on the thread that detected the eviction,
/// after the removal is committed. A panicking subscriber is caught and
/// logged; it never prevents later subscribers from running, nor the cache
/// operation that triggered it from completing.
pub struct EvictionNotifier<K> {
    subscribers: Mutex<Vec<(SubscriptionId, EvictionCallback<K>)>>,
    next_id: AtomicU64,
}

impl<K: CacheKey> EvictionNotifier<K> {
    // == Constructor ==
    /// Creates a notifier with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    // Callbacks never run under this mutex, so a panicking subscriber cannot
    // leave it poisoned; recover regardless.
    fn registry(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, EvictionCallback<K>)>> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // == Subscribe ==
    /// Registers a callback; returns the handle to unsubscribe with.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&K, EvictionReason) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.registry().push((id, Arc::new(callback)));
        id
    }

    // == Unsubscribe ==
    /// Removes a previously registered callback.
    ///
    /// Returns false if the handle was already removed or never existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.registry();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    // == Subscriber Count ==
    pub fn subscriber_count(&self) -> usize {
        self.registry().len()
    }

    // == Notify ==
    /// Delivers one eviction to every subscriber, in registration order.
    ///
    /// The registry lock is released before any callback runs, so a
    /// subscriber may subscribe or unsubscribe re-entrantly; such changes
    /// take effect from the next eviction. Failures are isolated per
    /// subscriber and reported through the logger.
    pub fn notify(&self, eviction: &Eviction<K>, logger: &dyn Logger) {
        let snapshot: Vec<(SubscriptionId, EvictionCallback<K>)> =
            self.registry().iter().cloned().collect();

        for (id, callback) in &snapshot {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                callback(&eviction.key, eviction.reason)
            }));
            if outcome.is_err() {
                logger.error(&format!(
                    "eviction subscriber {:?} panicked for key {:?} ({})",
                    id, eviction.key, eviction.reason
                ));
            }
        }
    }
}

impl<K: CacheKey> Default for EvictionNotifier<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> std::fmt::Debug for EvictionNotifier<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.subscribers.lock().map(|s| s.len()).unwrap_or(0);
        f.debug_struct("EvictionNotifier")
            .field("subscribers", &count)
            .finish()
    }
}
