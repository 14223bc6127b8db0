//! Core data models for the movie catalog
//!
//! This module contains the normalized record shapes served to callers and the
//! filter set used to query the upstream discovery endpoint.

pub mod genres;
pub mod tmdb;

pub use tmdb::{CatalogSource, TmdbClient, TmdbError};

use serde::{Deserialize, Serialize};

/// Source tag prepended to every upstream id
pub const ID_PREFIX: &str = "tmdb";

/// Type tag for every record this adapter produces
pub const MOVIE_TYPE: &str = "movie";

/// Filters for a catalog listing
///
/// Only `year` is required; every other filter is left out of the upstream
/// query when unset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogFilters {
    /// Primary release year
    pub year: u16,
    /// Upstream genre id (e.g. "28" for Action)
    pub genre: Option<String>,
    /// Minimum vote average (0.0 - 10.0)
    pub min_rating: Option<f64>,
    /// Minimum runtime in minutes
    pub min_runtime: Option<u32>,
    /// ISO-639-1 original language code
    pub language: Option<String>,
}

impl CatalogFilters {
    /// Creates a filter set for a single release year with no other constraints
    pub fn for_year(year: u16) -> Self {
        Self {
            year,
            ..Default::default()
        }
    }
}

/// A normalized catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Namespaced id, e.g. `tmdb:603`
    pub id: String,
    /// Type tag, always `movie`
    #[serde(rename = "type")]
    pub kind: String,
    /// Display title
    pub name: String,
    /// Full poster URL, if upstream has a poster
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// Synopsis; empty when upstream has none
    pub description: String,
    /// Genre names
    pub genres: Vec<String>,
    /// Release year as a four-digit string
    pub year: String,
    /// Community vote average
    pub rating: f64,
    /// Runtime in minutes, if upstream reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
}

/// A normalized item detail
///
/// Serializes flat: the summary fields sit next to `cast`, `director` and
/// `trailer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    #[serde(flatten)]
    pub summary: SummaryRecord,
    /// Cast member names joined with ", "
    pub cast: String,
    /// First crew member credited as Director
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    /// Video key of the first trailer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailer: Option<String>,
}

/// Builds the namespaced id for an upstream movie id
pub fn namespaced_id(upstream_id: u64) -> String {
    format!("{}:{}", ID_PREFIX, upstream_id)
}

/// Extracts the upstream numeric id from a namespaced id like `tmdb:603`
///
/// Returns `None` if the prefix is not ours or the remainder is not a number.
pub fn parse_namespaced_id(id: &str) -> Option<u64> {
    let (prefix, rest) = id.split_once(':')?;
    if prefix != ID_PREFIX {
        return None;
    }
    rest.parse().ok()
}

/// Truncates a `YYYY-MM-DD` date to its year component
///
/// Returns `None` unless the date starts with four ASCII digits.
pub fn release_year(date: &str) -> Option<String> {
    let year = date.get(..4)?;
    if year.bytes().all(|b| b.is_ascii_digit()) {
        Some(year.to_string())
    } else {
        None
    }
}
