//! Runtime configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then the
//! `TMDB_API_KEY` environment variable. The API key has no default and must come
//! from the file or the environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the TMDB credential
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Default TMDB v3 API root
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default poster image root
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Default response locale
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Per-request upstream timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a cached response stays fresh
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for our schema
    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// No API key in the config file or the environment
    #[error("No TMDB API key configured; set TMDB_API_KEY or api_key in the config file")]
    MissingApiKey,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// TMDB v3 API key, sent as the `api_key` query parameter
    pub api_key: String,
    /// API root, overridable for testing
    pub base_url: String,
    /// Image root used to build poster URLs
    pub image_base_url: String,
    /// Locale sent with every request
    pub language: String,
    /// Timeout applied to each upstream request
    pub request_timeout: Duration,
    /// Freshness window for cached responses
    pub cache_ttl: Duration,
}

/// On-disk config file layout; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub image_base_url: Option<String>,
    pub language: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub cache_ttl_secs: Option<u64>,
}

impl FileConfig {
    /// Read and parse a TOML config file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Config {
    /// Defaults with the given API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Load configuration for the running process
    ///
    /// An explicit `path` must exist. Without one, the XDG config file
    /// (`~/.config/moviecat/config.toml` on Linux) is used if present.
    ///
    /// # Arguments
    /// * `path` - Config file from `--config`, if given
    ///
    /// # Returns
    /// * `Ok(Config)` with defaults, file values and `TMDB_API_KEY` layered in that order
    /// * `Err(ConfigError)` if the file can't be read or parsed, or no API key is set
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => Some(FileConfig::from_path(path)?),
            None => match default_config_path() {
                Some(path) if path.exists() => Some(FileConfig::from_path(&path)?),
                _ => None,
            },
        };
        let env_key = std::env::var(API_KEY_ENV).ok();

        Self::from_sources(file.unwrap_or_default(), env_key)
    }

    /// Merge file values over defaults, then the environment key over both
    pub fn from_sources(file: FileConfig, env_key: Option<String>) -> Result<Self, ConfigError> {
        let api_key = env_key
            .filter(|key| !key.trim().is_empty())
            .or(file.api_key.filter(|key| !key.trim().is_empty()))
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::with_api_key(api_key);
        if let Some(base_url) = file.base_url {
            config.base_url = base_url;
        }
        if let Some(image_base_url) = file.image_base_url {
            config.image_base_url = image_base_url;
        }
        if let Some(language) = file.language {
            config.language = language;
        }
        if let Some(secs) = file.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.cache_ttl_secs {
            config.cache_ttl = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

/// XDG-compliant config file location, if a home directory exists
pub fn default_config_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "moviecat")?;
    Some(project_dirs.config_dir().join("config.toml"))
}
