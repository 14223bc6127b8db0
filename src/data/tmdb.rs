//! TMDB (The Movie Database) API client
//!
//! This module fetches filtered discovery listings and single-movie details from
//! the TMDB v3 API and maps them into our `SummaryRecord` / `DetailRecord` shapes.
//! Every request is bounded by the configured timeout; failures come back as a
//! typed `TmdbError` and are never retried here.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::genres::genre_name;
use super::{
    namespaced_id, release_year, CatalogFilters, DetailRecord, SummaryRecord, MOVIE_TYPE,
};
use crate::config::Config;

/// Crew job that marks the director
const DIRECTOR_JOB: &str = "Director";

/// Video type that marks a trailer
const TRAILER_TYPE: &str = "Trailer";

/// Errors that can occur when fetching from TMDB
#[derive(Debug, Error)]
pub enum TmdbError {
    /// HTTP request failed (connection error, timeout, body read)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// TMDB answered with a non-success status
    #[error("Upstream returned status {0}")]
    Status(StatusCode),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),
}

impl TmdbError {
    /// Whether this failure was the request timeout firing
    pub fn is_timeout(&self) -> bool {
        matches!(self, TmdbError::RequestFailed(e) if e.is_timeout())
    }
}

/// Upstream operations the cached fetch layer depends on
///
/// `TmdbClient` is the production implementation; tests substitute stubs.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the first page of movies matching `filters`, most popular first
    async fn fetch_list(&self, filters: &CatalogFilters) -> Result<Vec<SummaryRecord>, TmdbError>;

    /// Fetch one movie with its credits and videos
    async fn fetch_detail(&self, id: u64) -> Result<DetailRecord, TmdbError>;
}

/// Client for the TMDB v3 REST API
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
    language: String,
}

impl fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl TmdbClient {
    /// Create a client from configuration
    ///
    /// The underlying HTTP client carries the configured request timeout, so a
    /// slow upstream surfaces as `TmdbError::RequestFailed`.
    pub fn from_config(config: &Config) -> Result<Self, TmdbError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    /// Issue a GET against `path` with the credential and locale attached
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, TmdbError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "requesting TMDB");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TmdbError::Status(status));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Map the fields shared by discovery results and movie details
    fn to_summary(&self, raw: RawMovie, genres: Vec<String>) -> Result<SummaryRecord, TmdbError> {
        let name = raw
            .title
            .ok_or_else(|| TmdbError::MissingField(format!("title (movie {})", raw.id)))?;
        let year = raw
            .release_date
            .as_deref()
            .and_then(release_year)
            .ok_or_else(|| TmdbError::MissingField(format!("release_date (movie {})", raw.id)))?;
        let rating = raw
            .vote_average
            .ok_or_else(|| TmdbError::MissingField(format!("vote_average (movie {})", raw.id)))?;

        Ok(SummaryRecord {
            id: namespaced_id(raw.id),
            kind: MOVIE_TYPE.to_string(),
            name,
            poster: raw
                .poster_path
                .filter(|path| !path.is_empty())
                .map(|path| self.poster_url(&path)),
            description: raw.overview.unwrap_or_default(),
            genres,
            year,
            rating,
            runtime: raw.runtime,
        })
    }

    /// Build a full poster URL from a TMDB path fragment like `/m.jpg`
    fn poster_url(&self, path: &str) -> String {
        format!("{}{}", self.image_base_url, path)
    }

    fn parse_discover(&self, response: DiscoverResponse) -> Result<Vec<SummaryRecord>, TmdbError> {
        response
            .results
            .into_iter()
            .map(|result| {
                let genres = result.genre_ids.into_iter().map(genre_name).collect();
                self.to_summary(result.movie, genres)
            })
            .collect()
    }

    fn parse_detail(&self, detail: MovieDetail) -> Result<DetailRecord, TmdbError> {
        let credits = detail.credits.ok_or_else(|| {
            TmdbError::MissingField(format!("credits (movie {})", detail.movie.id))
        })?;
        let videos = detail.videos.unwrap_or_default();

        let cast = credits
            .cast
            .iter()
            .map(|member| member.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let director = find_director(&credits.crew);
        let trailer = find_trailer(&videos.results);
        let genres = detail.genres.into_iter().map(|genre| genre.name).collect();

        Ok(DetailRecord {
            summary: self.to_summary(detail.movie, genres)?,
            cast,
            director,
            trailer,
        })
    }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    async fn fetch_list(&self, filters: &CatalogFilters) -> Result<Vec<SummaryRecord>, TmdbError> {
        let response: DiscoverResponse = self
            .get_json("/discover/movie", &discover_params(filters))
            .await?;
        self.parse_discover(response)
    }

    async fn fetch_detail(&self, id: u64) -> Result<DetailRecord, TmdbError> {
        let detail: MovieDetail = self
            .get_json(
                &format!("/movie/{}", id),
                &[("append_to_response", "credits,videos".to_string())],
            )
            .await?;
        self.parse_detail(detail)
    }
}

/// Query parameters for the discovery endpoint
///
/// Always requests page one sorted by popularity with adult and video-only
/// entries excluded; optional filters are only sent when set.
fn discover_params(filters: &CatalogFilters) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("sort_by", "popularity.desc".to_string()),
        ("include_adult", "false".to_string()),
        ("include_video", "false".to_string()),
        ("page", "1".to_string()),
        ("primary_release_year", filters.year.to_string()),
    ];
    if let Some(genre) = &filters.genre {
        params.push(("with_genres", genre.clone()));
    }
    if let Some(rating) = filters.min_rating {
        params.push(("vote_average.gte", rating.to_string()));
    }
    if let Some(runtime) = filters.min_runtime {
        params.push(("with_runtime.gte", runtime.to_string()));
    }
    if let Some(language) = &filters.language {
        params.push(("with_original_language", language.clone()));
    }
    params
}

/// First crew member whose job is Director
fn find_director(crew: &[CrewMember]) -> Option<String> {
    crew.iter()
        .find(|member| member.job.as_deref() == Some(DIRECTOR_JOB))
        .map(|member| member.name.clone())
}

/// Key of the first video whose type is Trailer
fn find_trailer(videos: &[Video]) -> Option<String> {
    videos
        .iter()
        .find(|video| video.kind.as_deref() == Some(TRAILER_TYPE))
        .map(|video| video.key.clone())
}

/// Fields common to discovery results and movie details
#[derive(Debug, Deserialize)]
struct RawMovie {
    id: u64,
    title: Option<String>,
    poster_path: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f64>,
    runtime: Option<u32>,
}

/// Response from `/discover/movie`
#[derive(Debug, Deserialize)]
struct DiscoverResponse {
    results: Vec<DiscoverResult>,
}

#[derive(Debug, Deserialize)]
struct DiscoverResult {
    #[serde(flatten)]
    movie: RawMovie,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

/// Response from `/movie/{id}?append_to_response=credits,videos`
#[derive(Debug, Deserialize)]
struct MovieDetail {
    #[serde(flatten)]
    movie: RawMovie,
    #[serde(default)]
    genres: Vec<Genre>,
    credits: Option<Credits>,
    videos: Option<Videos>,
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<CastMember>,
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct CastMember {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    job: Option<String>,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Videos {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    key: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}
