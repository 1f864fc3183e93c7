//! Expiration Policy Module
//!
//! Defines how an entry's expiry deadline is computed and whether it is
//! refreshed on access.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{CacheError, Result};

// == Expiration Policy ==
/// Per-entry expiration behavior, fixed at insertion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpirationPolicy {
    /// Entry never expires
    NoExpiration,
    /// Deadline = last access (or insert) time + duration; every successful
    /// read renews it
    Sliding(Duration),
    /// Fixed deadline, unaffected by access
    Absolute(DateTime<Utc>),
}

impl ExpirationPolicy {
    // == Deadline Computation ==
    /// Computes the expiry deadline for an entry touched at `now`.
    ///
    /// Returns `None` for `NoExpiration`. A sliding duration of zero, or one
    /// too large to represent as a timestamp offset, is rejected as
    /// `InvalidPolicy` rather than silently treated as non-expiring.
    pub fn deadline_from(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        match self {
            ExpirationPolicy::NoExpiration => Ok(None),
            ExpirationPolicy::Sliding(duration) => {
                if duration.is_zero() {
                    return Err(CacheError::InvalidPolicy(
                        "sliding expiration duration must be non-zero".to_string(),
                    ));
                }
                let delta = TimeDelta::from_std(*duration).map_err(|_| {
                    CacheError::InvalidPolicy(format!(
                        "sliding expiration duration out of range: {:?}",
                        duration
                    ))
                })?;
                let deadline = now.checked_add_signed(delta).ok_or_else(|| {
                    CacheError::InvalidPolicy(format!(
                        "sliding expiration overflows the timestamp range: {:?}",
                        duration
                    ))
                })?;
                Ok(Some(deadline))
            }
            ExpirationPolicy::Absolute(timestamp) => Ok(Some(*timestamp)),
        }
    }

    // == Renews On Read ==
    /// Whether a successful read recomputes the deadline.
    pub fn renews_on_read(&self) -> bool {
        matches!(self, ExpirationPolicy::Sliding(_))
    }
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        ExpirationPolicy::NoExpiration
    }
}

// == Eviction Reason ==
/// Why an entry was involuntarily removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EvictionReason {
    /// Insertion pushed the cache over capacity; this was the LRU entry
    CapacityExceeded,
    /// The entry's expiry deadline had passed
    Expired,
}

impl std::fmt::Display for EvictionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvictionReason::CapacityExceeded => write!(f, "capacity exceeded"),
            EvictionReason::Expired => write!(f, "expired"),
        }
    }
}
