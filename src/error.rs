//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.
//!
//! A missing key is deliberately NOT an error: `get` and `remove` return
//! `Ok(None)` for absent keys, so callers can tell a normal negative result
//! apart from an actual failure.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A malformed key was passed to get/put/remove
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Cache constructed with a capacity of zero
    #[error("Invalid capacity: {0} (must be > 0)")]
    InvalidCapacity(usize),

    /// Expiration policy carries an unusable parameter
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// Invariant violation (entry map and recency tracker diverged)
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
