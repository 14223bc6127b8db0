//! Cache-fronted fetch layer
//!
//! `CachedFetcher` wraps a `CatalogSource` with an `ExpiringCache`. Every call
//! checks the cache first; on a miss or a stale entry it asks the upstream, stores
//! a successful result with a fresh timestamp and returns it. Upstream failures
//! are logged and collapsed to an empty result here, so nothing above this layer
//! ever sees an error. Failures are not cached, so the next request retries the
//! upstream as soon as it is healthy again.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CacheKey, CachedPayload, ExpiringCache};
use crate::data::{CatalogFilters, CatalogSource, DetailRecord, SummaryRecord};

/// Memoizing front for catalog and detail lookups
#[derive(Debug, Clone)]
pub struct CachedFetcher<S> {
    source: Arc<S>,
    cache: ExpiringCache,
}

impl<S: CatalogSource> CachedFetcher<S> {
    pub fn new(source: S, cache: ExpiringCache) -> Self {
        Self {
            source: Arc::new(source),
            cache,
        }
    }

    /// Access to the underlying cache, mainly for diagnostics
    pub fn cache(&self) -> &ExpiringCache {
        &self.cache
    }

    /// Movies matching `filters`, served from the cache while fresh
    ///
    /// # Arguments
    /// * `filters` - The discovery filters; also the cache key
    ///
    /// # Returns
    /// The upstream listing, or an empty list if the upstream fails. Failures
    /// are logged and never cached.
    pub async fn catalog(&self, filters: &CatalogFilters) -> Vec<SummaryRecord> {
        let key = CacheKey::Catalog(filters.clone());

        if let Some(entry) = self.cache.get(&key) {
            if let CachedPayload::List(records) = entry.data {
                debug!(?filters, "catalog cache hit");
                return records;
            }
        }

        debug!(?filters, "catalog cache miss, fetching upstream");
        match self.source.fetch_list(filters).await {
            Ok(records) => {
                self.cache.put(&key, CachedPayload::List(records.clone()));
                records
            }
            Err(e) => {
                warn!(?filters, timed_out = e.is_timeout(), error = %e, "catalog fetch failed");
                Vec::new()
            }
        }
    }

    /// Detail for upstream movie `id`, `None` if the upstream fails
    pub async fn detail(&self, id: u64) -> Option<DetailRecord> {
        let key = CacheKey::Detail { id };

        if let Some(entry) = self.cache.get(&key) {
            if let CachedPayload::Detail(record) = entry.data {
                debug!(id, "detail cache hit");
                return Some(record);
            }
        }

        debug!(id, "detail cache miss, fetching upstream");
        match self.source.fetch_detail(id).await {
            Ok(record) => {
                self.cache.put(&key, CachedPayload::Detail(record.clone()));
                Some(record)
            }
            Err(e) => {
                warn!(id, timed_out = e.is_timeout(), error = %e, "detail fetch failed");
                None
            }
        }
    }
}
