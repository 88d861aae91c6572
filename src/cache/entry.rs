//! Cache Entry Module
//!
//! Defines a single stored upstream result and its freshness rule.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored value together with the instant it was written.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored payload
    pub value: V,
    /// When the entry was written
    pub stored_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry written at `stored_at`.
    pub fn new(value: V, stored_at: Instant) -> Self {
        Self { value, stored_at }
    }

    // == Age ==
    /// Time elapsed since the entry was written, zero if `now` is earlier.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    // == Is Fresh ==
    /// Checks whether the entry may still be served.
    ///
    /// Boundary condition: an entry is fresh only while `now - stored_at < ttl`.
    /// Once the full TTL has elapsed the entry is stale and must be treated as
    /// absent.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}
