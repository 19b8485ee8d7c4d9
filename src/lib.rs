//! Crawl-Deck: a terminal dashboard for a remote web-crawling service
//!
//! This crate talks to the crawl service's JSON API and keeps presentation-ready
//! view-models in sync with it: a filterable, sortable, paginated record list
//! with bulk selection, and a per-record detail view with its broken links.
//! Both views poll the API while any crawl job is still in flight.

pub mod api;
pub mod config;
pub mod detail;
pub mod model;
pub mod output;
pub mod poll;
pub mod view;

use thiserror::Error;

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while talking to the crawl API
///
/// Transport failures, non-2xx responses and malformed payloads all end up
/// here. The view-models turn every variant into a recoverable error state
/// carrying the `Display` text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("{method} {url} returned HTTP {status}: {message}")]
    Status {
        method: String,
        url: String,
        status: u16,
        message: String,
    },

    #[error("Unexpected response from {url}: {detail}")]
    Decode { url: String, detail: String },

    #[error("Invalid endpoint: {0}")]
    Endpoint(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Returns the HTTP status code for non-2xx responses
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for API operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

// Re-export commonly used types
pub use api::{CrawlApi, HttpCrawlApi};
pub use config::Config;
pub use detail::{DetailController, DetailSession};
pub use model::{BrokenLink, CrawlStatus, Record, RecordId};
pub use poll::{ListController, ListSession, LoadState, Notice, Severity};
pub use view::{ListView, RecordFilter, SortDirection, SortKey, SortSpec};
