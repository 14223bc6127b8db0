//! Cache module for short-lived upstream responses
//!
//! This module provides an in-memory cache that stores catalog listings and movie
//! details with the time they were fetched. Entries older than the TTL are
//! reported as missing on read and are overwritten by the next store; nothing is
//! swept in the background and nothing survives a restart.

mod key;
mod manager;

pub use key::CacheKey;
pub use manager::{CacheEntry, CachedPayload, Clock, ExpiringCache, ManualClock, SystemClock};
