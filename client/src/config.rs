//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

use reqwest::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_FILE: &str = ".jobhub-session.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid value for {key}: {value}")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeouts: Timeouts,
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_owned(),
            timeouts: Timeouts::default(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `JOBHUB_API_URL`: default `http://localhost:8000/api`
    /// - `JOBHUB_REQUEST_TIMEOUT_SECS`: default 30
    /// - `JOBHUB_CONNECT_TIMEOUT_SECS`: default 10
    /// - `JOBHUB_SESSION_FILE`: default `.jobhub-session.json`
    ///
    /// # Errors
    ///
    /// Returns an error for a non-http(s) URL or a non-numeric timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-http(s) URL or a non-numeric timeout.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = normalize_base_url(&get("JOBHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()))?;
        let timeouts = Timeouts {
            request_secs: parse_u64("JOBHUB_REQUEST_TIMEOUT_SECS", get("JOBHUB_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_u64("JOBHUB_CONNECT_TIMEOUT_SECS", get("JOBHUB_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let session_file = get("JOBHUB_SESSION_FILE").map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        Ok(Self { base_url, timeouts, session_file })
    }
}

/// Parse `raw` as an http(s) URL with a host and drop trailing slashes.
///
/// # Errors
///
/// Returns `InvalidBaseUrl` when the URL does not parse or the scheme or
/// host is missing.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidBaseUrl(raw.to_owned());
    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }
    Ok(url.as_str().trim_end_matches('/').to_owned())
}

fn parse_u64(key: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}
