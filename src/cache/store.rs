//! Cache Store Module
//!
//! Process-wide TTL cache: a HashMap behind a read/write lock, with lazy
//! expiry. Stale entries stay in the map until the next `put` for the same key
//! overwrites them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::cache::{CacheEntry, Clock, SystemClock};

// == TTL Cache ==
/// In-memory cache whose entries are served only while fresh.
///
/// `get` takes a read lock and never mutates, `put` takes a write lock and
/// unconditionally overwrites. There is no size bound and no eviction.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// Freshness window applied to every entry
    ttl: Duration,
    /// Time source for lookups
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Returns the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the current instant according to the cache clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    // == Get ==
    /// Returns a clone of the stored value if it is still fresh.
    ///
    /// A stale entry is indistinguishable from a missing one.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, self.clock.now())
    }

    /// Same as [`get`](Self::get), evaluated at an explicit instant.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.value.clone())
    }

    // == Put ==
    /// Stores `value` under `key`, stamped with `now`.
    ///
    /// Any previous entry for the key is replaced, fresh or not.
    pub fn put(&self, key: impl Into<String>, value: V, now: Instant) {
        self.entries
            .write()
            .insert(key.into(), CacheEntry::new(value, now));
    }

    // == Length ==
    /// Returns the number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns the number of entries that would currently be served.
    pub fn fresh_len(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .read()
            .values()
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .count()
    }
}
