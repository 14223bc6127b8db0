//! Catalog and meta request handlers
//!
//! Thin wrappers that validate the addressed resource, hand parsed parameters to
//! the `CachedFetcher` and wrap whatever comes back into the response shapes.
//! Requests for anything other than our movie catalog get an empty response
//! rather than an error.

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::data::{
    parse_namespaced_id, CatalogFilters, CatalogSource, DetailRecord, SummaryRecord, MOVIE_TYPE,
};
use crate::fetch::CachedFetcher;

/// Id of the movie discovery catalog
pub const CATALOG_ID: &str = "multi-industry-movies";

/// Id of the TV catalog; declared but has no upstream source, so always empty
pub const SERIES_CATALOG_ID: &str = "multi-industry-series";

/// Type tag of the TV catalog
pub const SERIES_TYPE: &str = "series";

/// Response to a catalog request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogResponse {
    pub metas: Vec<SummaryRecord>,
}

/// Response to a meta request
///
/// A missing record serializes as an empty object: `{"meta":{}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaResponse {
    #[serde(serialize_with = "serialize_meta")]
    pub meta: Option<DetailRecord>,
}

fn serialize_meta<S: Serializer>(
    meta: &Option<DetailRecord>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match meta {
        Some(record) => record.serialize(serializer),
        None => serde_json::Map::new().serialize(serializer),
    }
}

/// Serves a catalog listing
///
/// # Arguments
/// * `fetcher` - The cache-fronted upstream
/// * `kind` - Resource type, `movie` or `series`
/// * `catalog_id` - Which catalog is addressed
/// * `filters` - Parsed discovery filters
///
/// # Returns
/// The movie listing for `movie` / `multi-industry-movies`; an empty listing for
/// the series catalog and anything unknown.
pub async fn catalog<S: CatalogSource>(
    fetcher: &CachedFetcher<S>,
    kind: &str,
    catalog_id: &str,
    filters: &CatalogFilters,
) -> CatalogResponse {
    match (kind, catalog_id) {
        (MOVIE_TYPE, CATALOG_ID) => CatalogResponse {
            metas: fetcher.catalog(filters).await,
        },
        (SERIES_TYPE, SERIES_CATALOG_ID) => {
            debug!(catalog_id, "series catalog has no source");
            CatalogResponse { metas: Vec::new() }
        }
        _ => {
            debug!(kind, catalog_id, "unknown catalog requested");
            CatalogResponse { metas: Vec::new() }
        }
    }
}

/// Serves a single item's detail for a namespaced id like `tmdb:603`
///
/// Any `tmdb:` id is looked up as a movie whatever `kind` says; other ids get
/// an empty meta.
pub async fn meta<S: CatalogSource>(
    fetcher: &CachedFetcher<S>,
    kind: &str,
    id: &str,
) -> MetaResponse {
    let Some(upstream_id) = parse_namespaced_id(id) else {
        debug!(kind, id, "malformed meta id");
        return MetaResponse { meta: None };
    };

    MetaResponse {
        meta: fetcher.detail(upstream_id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ExpiringCache;
    use crate::fetch::tests::{matrix, StubSource};
    use std::time::Duration;

    fn fetcher(source: StubSource) -> CachedFetcher<StubSource> {
        CachedFetcher::new(source, ExpiringCache::new(Duration::from_secs(600)))
    }

    #[tokio::test]
    async fn test_catalog_returns_metas() {
        let fetcher = fetcher(StubSource::default());
        let filters = CatalogFilters::for_year(1999);

        let response = catalog(&fetcher, "movie", CATALOG_ID, &filters).await;

        assert_eq!(response.metas, vec![matrix()]);
    }

    #[tokio::test]
    async fn test_unknown_catalog_is_empty_without_upstream_call() {
        let fetcher = fetcher(StubSource::default());
        let filters = CatalogFilters::for_year(1999);

        for (kind, catalog_id) in [
            (SERIES_TYPE, SERIES_CATALOG_ID),
            (SERIES_TYPE, CATALOG_ID),
            ("movie", SERIES_CATALOG_ID),
            ("movie", "tmdb-discover"),
        ] {
            let response = catalog(&fetcher, kind, catalog_id, &filters).await;
            assert!(response.metas.is_empty(), "{kind}/{catalog_id} should be empty");
        }
        assert!(fetcher.cache().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_failure_serializes_as_empty_list() {
        let fetcher = fetcher(StubSource::failing());
        let filters = CatalogFilters::for_year(1999);

        let response = catalog(&fetcher, "movie", CATALOG_ID, &filters).await;

        assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"metas":[]}"#);
    }

    #[tokio::test]
    async fn test_meta_extracts_upstream_id() {
        let fetcher = fetcher(StubSource::default());

        let response = meta(&fetcher, "movie", "tmdb:603").await;

        let record = response.meta.expect("Meta should be present");
        assert_eq!(record.summary.id, "tmdb:603");
    }

    #[tokio::test]
    async fn test_meta_failure_serializes_as_empty_object() {
        let fetcher = fetcher(StubSource::failing());

        let response = meta(&fetcher, "movie", "tmdb:603").await;

        assert!(response.meta.is_none());
        assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"meta":{}}"#);
    }

    #[tokio::test]
    async fn test_malformed_meta_ids_are_empty() {
        let fetcher = fetcher(StubSource::default());

        for id in ["603", "tmdb:", "tmdb:abc", "imdb:tt0133093"] {
            let response = meta(&fetcher, "movie", id).await;
            assert!(response.meta.is_none(), "{id} should be rejected");
        }
        assert!(fetcher.cache().is_empty());
    }

    #[tokio::test]
    async fn test_meta_ignores_type_for_tmdb_ids() {
        let fetcher = fetcher(StubSource::default());

        let response = meta(&fetcher, SERIES_TYPE, "tmdb:603").await;

        let record = response.meta.expect("Any tmdb: id is looked up");
        assert_eq!(record.summary.id, "tmdb:603");
    }

    #[tokio::test]
    async fn test_meta_response_serializes_record_flat() {
        let fetcher = fetcher(StubSource::default());

        let response = meta(&fetcher, "movie", "tmdb:603").await;
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["meta"]["id"], "tmdb:603");
        assert_eq!(json["meta"]["type"], "movie");
        assert_eq!(json["meta"]["cast"], "Keanu Reeves");
        assert!(json["meta"].get("director").is_none());
    }
}
