//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with expiration support.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cache::ExpirationPolicy;
use crate::error::Result;

// == Cache Entry ==
/// A single cache entry: the stored value, its expiration policy, and the
/// deadline computed from that policy.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// How the expiry deadline is computed
    pub policy: ExpirationPolicy,
    /// Expiry deadline, None = never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry, computing the deadline from the policy as of `now`.
    ///
    /// Fails with `InvalidPolicy` if the policy carries an unusable
    /// parameter.
    pub fn new(value: V, policy: ExpirationPolicy, now: DateTime<Utc>) -> Result<Self> {
        let expires_at = policy.deadline_from(now)?;
        Ok(Self {
            value,
            policy,
            expires_at,
        })
    }

    // == Is Expired ==
    /// Checks whether the entry is expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now` is greater than or
    /// equal to the deadline, so the deadline instant itself counts as
    /// expired. Entries without a deadline never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }

    // == Touch ==
    /// Records a successful read at `now`.
    ///
    /// Under a sliding policy this renews the deadline to `now + duration`;
    /// absolute and non-expiring entries are unchanged.
    pub fn touch(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.policy.renews_on_read() {
            self.expires_at = self.policy.deadline_from(now)?;
        }
        Ok(())
    }

    // == Expires In ==
    /// Remaining lifetime as of `now`, or None for non-expiring entries.
    ///
    /// Returns a zero duration once the deadline has passed. Useful for
    /// debugging and statistics.
    pub fn expires_in(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at
            .map(|deadline| (deadline - now).to_std().unwrap_or(Duration::ZERO))
    }
}
