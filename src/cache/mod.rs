//! Cache Module
//!
//! In-memory caching with LRU eviction, per-entry expiration policies, and
//! eviction notifications.

mod engine;
mod entry;
mod events;
mod key;
mod lru;
mod policy;
mod stats;
mod store;


// Re-export public types
pub use engine::LruCache;
pub use entry::CacheEntry;
pub use events::{Eviction, EvictionNotifier, SubscriptionId};
pub use key::CacheKey;
pub use lru::RecencyTracker;
pub use policy::{EvictionReason, ExpirationPolicy};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed string key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
