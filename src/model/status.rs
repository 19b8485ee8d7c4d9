//! Crawl job status definitions
//!
//! This module defines the lifecycle states a record reports through the API.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Represents the lifecycle state of a crawl job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrawlStatus {
    // ===== Active States =====
    /// Job accepted by the service but not started yet
    Queued,

    /// Job is being crawled right now
    Running,

    // ===== Terminal States =====
    /// Crawl finished and the analysis payload is filled in
    Done,

    /// Crawl failed
    Error,

    /// Status missing or not recognised; treated as terminal
    #[default]
    Unknown,
}

impl CrawlStatus {
    /// Returns true while the server may still change this record
    ///
    /// Views keep polling as long as any record they show is active.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Queued | Self::Running)
    }

    /// Returns true if no further server-side progress is expected
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Converts the status to its API string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Done => "done",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a status from its API string representation
    ///
    /// Matching is case-insensitive; anything unrecognised becomes `Unknown`.
    pub fn from_api_str(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "queued" => Self::Queued,
            "running" => Self::Running,
            "done" => Self::Done,
            "error" => Self::Error,
            _ => Self::Unknown,
        }
    }

    /// Returns the four statuses the service reports
    pub fn known_states() -> [Self; 4] {
        [Self::Queued, Self::Running, Self::Done, Self::Error]
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CrawlStatus {
    type Err = String;

    /// Strict parse used for user input such as CLI filters
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_api_str(s) {
            Self::Unknown => Err(format!(
                "unknown status '{}', expected one of: queued, running, done, error",
                s
            )),
            status => Ok(status),
        }
    }
}

impl Serialize for CrawlStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CrawlStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::from_api_str).unwrap_or_default())
    }
}
