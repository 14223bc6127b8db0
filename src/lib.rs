//! moviecat library
//!
//! A TMDB-backed movie catalog: filtered discovery listings and per-movie
//! details behind a short-lived in-memory cache. The modules are exposed for the
//! binary and for integration tests.

pub mod addon;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod fetch;
