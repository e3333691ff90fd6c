//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPFRONT_API_URL` - Backend base URL (default: `http://localhost:8000/api`)
//! - `SHOPFRONT_SESSION_FILE` - Where the session is persisted (default: `.shopfront/session.json`)
//! - `SHOPFRONT_PAGE_SIZE` - Page size for client-side search results (default: 12)
//! - `SHOPFRONT_TIMEOUT_SECS` - HTTP request timeout in seconds (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN (used by the CLI)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_SESSION_FILE: &str = ".shopfront/session.json";
const DEFAULT_PAGE_SIZE: &str = "12";
const DEFAULT_TIMEOUT_SECS: &str = "30";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, including the `/api` prefix
    pub api_url: Url,
    /// JSON file holding the signed-in user and token
    pub session_file: PathBuf,
    /// Page size used when paging client-side search results
    pub page_size: usize,
    /// Per-request timeout
    pub timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_url = parse_api_url(&get("SHOPFRONT_API_URL", DEFAULT_API_URL))?;
        let session_file = PathBuf::from(get("SHOPFRONT_SESSION_FILE", DEFAULT_SESSION_FILE));
        let page_size = get("SHOPFRONT_PAGE_SIZE", DEFAULT_PAGE_SIZE)
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "SHOPFRONT_PAGE_SIZE".to_string(),
                    "must be a positive integer".to_string(),
                )
            })?;
        let timeout = get("SHOPFRONT_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPFRONT_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        let sentry_dsn = lookup("SENTRY_DSN").filter(|s| !s.is_empty());

        Ok(Self {
            api_url,
            session_file,
            page_size,
            timeout,
            sentry_dsn,
        })
    }

    /// Override the backend URL (e.g. from a CLI flag).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL is not http(s).
    pub fn with_api_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_api_url(url)?;
        Ok(self)
    }
}

/// Parse and validate the backend base URL.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        ConfigError::InvalidEnvVar("SHOPFRONT_API_URL".to_string(), e.to_string())
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "SHOPFRONT_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}
