//! Cache Module
//!
//! Provides the process-wide TTL cache, its key canonicalization and hit/miss
//! statistics.

mod clock;
mod entry;
mod key;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::{canonical_query, CacheKey, CacheKeyBuilder};
pub use stats::{CacheStats, StatsSnapshot};
pub use store::TtlCache;

// == Public Constants ==
/// Freshness window for every cached upstream response.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(15 * 60);
