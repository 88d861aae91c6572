//! Cache Statistics Module
//!
//! Counts hits, misses and failed upstream fetches. Counters are atomic so
//! they can be bumped from concurrent handlers without touching the cache
//! lock.

use std::sync::atomic::{AtomicU64, Ordering};

// == Cache Stats ==
/// Live counters shared by all requests.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    upstream_errors: AtomicU64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Upstream Error ==
    /// Increments the failed-fetch counter.
    pub fn record_upstream_error(&self) {
        self.upstream_errors.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Reads all counters at once.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            upstream_errors: self.upstream_errors.load(Ordering::Relaxed),
        }
    }
}

// == Stats Snapshot ==
/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to go upstream (missing or stale)
    pub misses: u64,
    /// Misses whose upstream fetch failed
    pub upstream_errors: u64,
}

impl StatsSnapshot {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn test_record_counters() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        stats.record_upstream_error();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.hits, 2);
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.upstream_errors, 1);
    }

    #[test]
    fn test_hit_rate() {
        let snapshot = StatsSnapshot {
            hits: 80,
            misses: 20,
            upstream_errors: 0,
        };
        assert!((snapshot.hit_rate() - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_hit_rate_zero_requests() {
        assert_eq!(StatsSnapshot::default().hit_rate(), 0.0);
    }
}
