//! Command-line interface parsing for moviecat
//!
//! This module handles parsing of CLI arguments using clap: a `catalog`
//! subcommand taking the discovery filters and a `meta` subcommand taking a
//! namespaced movie id.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::addon::CATALOG_ID;
use crate::data::{CatalogFilters, MOVIE_TYPE};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The minimum rating is not a number between 0 and 10
    #[error("Invalid rating: '{0}'. Expected a number between 0 and 10")]
    InvalidRating(String),
}

/// moviecat - Browse TMDB movies by year, genre, rating, runtime and language
#[derive(Parser, Debug)]
#[command(name = "moviecat")]
#[command(about = "TMDB movie catalog with filtered discovery and cached lookups")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List movies matching the given filters
    ///
    /// Examples:
    ///   moviecat catalog --year 2020
    ///   moviecat catalog --year 2020 --genre 28 --min-rating 7 --min-runtime 90 --language en
    Catalog(CatalogArgs),

    /// Show details for one movie
    ///
    /// Example:
    ///   moviecat meta tmdb:603
    Meta(MetaArgs),
}

/// Arguments for the catalog subcommand
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Resource type
    #[arg(long = "type", default_value = MOVIE_TYPE)]
    pub kind: String,

    /// Catalog id
    #[arg(long, default_value = CATALOG_ID)]
    pub catalog: String,

    /// Primary release year
    #[arg(long)]
    pub year: u16,

    /// TMDB genre id (e.g. 28 for Action)
    #[arg(long)]
    pub genre: Option<String>,

    /// Minimum vote average, 0 to 10
    #[arg(long, value_parser = parse_rating)]
    pub min_rating: Option<f64>,

    /// Minimum runtime in minutes
    #[arg(long)]
    pub min_runtime: Option<u32>,

    /// Original language as an ISO-639-1 code (e.g. en)
    #[arg(long)]
    pub language: Option<String>,
}

/// Arguments for the meta subcommand
#[derive(Args, Debug)]
pub struct MetaArgs {
    /// Resource type; logged only, any tmdb: id is looked up as a movie
    #[arg(long = "type", default_value = MOVIE_TYPE)]
    pub kind: String,

    /// Namespaced movie id, e.g. tmdb:603
    pub id: String,
}

impl CatalogArgs {
    /// The discovery filters these arguments describe
    pub fn to_filters(&self) -> CatalogFilters {
        CatalogFilters {
            year: self.year,
            genre: self.genre.clone(),
            min_rating: self.min_rating,
            min_runtime: self.min_runtime,
            language: self.language.clone(),
        }
    }
}

/// Parses a minimum rating argument.
///
/// # Arguments
/// * `s` - The raw `--min-rating` value
///
/// # Returns
/// * `Ok(f64)` for a finite value in 0..=10
/// * `Err(CliError::InvalidRating)` for anything else, NaN and infinities included
pub fn parse_rating(s: &str) -> Result<f64, CliError> {
    match s.parse::<f64>() {
        Ok(rating) if (0.0..=10.0).contains(&rating) => Ok(rating),
        _ => Err(CliError::InvalidRating(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rating_valid() {
        assert_eq!(parse_rating("7").unwrap(), 7.0);
        assert_eq!(parse_rating("7.5").unwrap(), 7.5);
        assert_eq!(parse_rating("0").unwrap(), 0.0);
        assert_eq!(parse_rating("10").unwrap(), 10.0);
    }

    #[test]
    fn test_parse_rating_invalid() {
        for input in ["-1", "10.5", "NaN", "inf", "seven", ""] {
            let result = parse_rating(input);
            assert!(result.is_err(), "{input} should be rejected");
        }
        let err = parse_rating("seven").unwrap_err();
        assert!(err.to_string().contains("Invalid rating"));
        assert!(err.to_string().contains("seven"));
    }

    #[test]
    fn test_cli_parse_catalog_year_only() {
        let cli = Cli::parse_from(["moviecat", "catalog", "--year", "2020"]);
        let Command::Catalog(args) = cli.command else {
            panic!("Expected catalog subcommand");
        };
        assert_eq!(args.kind, "movie");
        assert_eq!(args.catalog, CATALOG_ID);
        assert_eq!(args.to_filters(), CatalogFilters::for_year(2020));
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parse_catalog_all_filters() {
        let cli = Cli::parse_from([
            "moviecat",
            "catalog",
            "--year",
            "2020",
            "--genre",
            "28",
            "--min-rating",
            "7",
            "--min-runtime",
            "90",
            "--language",
            "en",
        ]);
        let Command::Catalog(args) = cli.command else {
            panic!("Expected catalog subcommand");
        };
        let filters = args.to_filters();
        assert_eq!(filters.year, 2020);
        assert_eq!(filters.genre.as_deref(), Some("28"));
        assert_eq!(filters.min_rating, Some(7.0));
        assert_eq!(filters.min_runtime, Some(90));
        assert_eq!(filters.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_cli_catalog_requires_year() {
        let result = Cli::try_parse_from(["moviecat", "catalog", "--genre", "28"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_out_of_range_rating() {
        let result =
            Cli::try_parse_from(["moviecat", "catalog", "--year", "2020", "--min-rating", "11"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_meta_with_global_flags() {
        let cli = Cli::parse_from([
            "moviecat",
            "meta",
            "tmdb:603",
            "--verbose",
            "--config",
            "/tmp/m.toml",
        ]);
        let Command::Meta(args) = cli.command else {
            panic!("Expected meta subcommand");
        };
        assert_eq!(args.id, "tmdb:603");
        assert_eq!(args.kind, "movie");
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/m.toml")));
    }
}
