//! In-memory expiring cache
//!
//! Provides an `ExpiringCache` that keeps upstream payloads with the timestamp
//! they were stored at, and hides entries once they are older than the TTL.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use super::CacheKey;
use crate::data::{DetailRecord, SummaryRecord};

/// Source of the current time for expiry checks
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
///
/// Lets callers step past the TTL without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward by `by`
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Payloads the cache can hold
#[derive(Debug, Clone, PartialEq)]
pub enum CachedPayload {
    /// A catalog listing
    List(Vec<SummaryRecord>),
    /// A single movie detail
    Detail(DetailRecord),
}

/// A stored payload and when it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached data
    pub data: CachedPayload,
    /// When the data was cached
    pub cached_at: DateTime<Utc>,
}

/// Keyed store of upstream payloads with read-time expiry
///
/// Reads of an entry at least `ttl` old behave as a miss; the stale entry stays
/// in place until the next `put` for the same key replaces it. There is no
/// capacity bound and no locking across a fetch: concurrent puts for one key
/// are last-write-wins. Clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct ExpiringCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ExpiringCache {
    /// Creates a cache on the system clock
    pub fn new(ttl: std::time::Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates a cache on a custom clock
    ///
    /// A `ttl` too large for a chrono duration is capped, so such entries never
    /// go stale.
    pub fn with_clock(ttl: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
            clock,
        }
    }

    /// Returns the entry for `key` if it is younger than the TTL
    ///
    /// # Arguments
    /// * `key` - The cache key to read
    ///
    /// # Returns
    /// * `Some(CacheEntry)` if the entry exists and `now - cached_at < ttl`
    /// * `None` if the entry is missing or stale; a stale entry stays stored
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let entry = self.entries.get(&key.encode())?;
        let age = self.clock.now() - entry.cached_at;
        if age < self.ttl {
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Stores `data` under `key` stamped with the current time
    ///
    /// # Arguments
    /// * `key` - Identifies the request the data answers
    /// * `data` - The payload to cache; replaces any previous entry for `key`
    pub fn put(&self, key: &CacheKey, data: CachedPayload) {
        let entry = CacheEntry {
            data,
            cached_at: self.clock.now(),
        };
        self.entries.insert(key.encode(), entry);
    }

    /// Number of stored entries, stale ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
