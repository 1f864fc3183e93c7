//! LRU Cache Engine - An embeddable concurrent key/value cache
//!
//! Capacity-bounded cache with least-recently-used eviction, optional
//! per-entry expiration (sliding or absolute), a background expiry sweeper,
//! and observable eviction notifications.

pub mod cache;
pub mod config;
pub mod error;
pub mod logger;
pub mod tasks;

pub use cache::{
    CacheKey, CacheStats, Eviction, EvictionReason, ExpirationPolicy, LruCache, SubscriptionId,
};
pub use config::Config;
pub use error::{CacheError, Result};
pub use logger::{Logger, NullLogger, TracingLogger};
pub use tasks::{spawn_sweeper, SweeperHandle};
