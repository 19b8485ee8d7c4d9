//! Crawled URL records as returned by the API

use crate::model::broken_link::BrokenLinksField;
use crate::model::lenient;
use crate::model::status::CrawlStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque record identity
///
/// The service uses integers today, but ids are echoed back exactly as
/// received, so string ids survive a round trip too.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("record id cannot be empty".to_string());
        }
        Ok(s.parse::<i64>()
            .map(Self::Number)
            .unwrap_or_else(|_| Self::Text(s.to_string())))
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

/// One crawled URL and its latest analysis
///
/// Analysis fields are only meaningful once `status` is `Done`; until then
/// they hold defaults (zero counts, empty strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub url: String,

    #[serde(default)]
    pub status: CrawlStatus,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub html_version: String,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub title: String,

    #[serde(default, alias = "h1", deserialize_with = "lenient::or_default")]
    pub h1_count: u32,

    #[serde(default, alias = "h2", deserialize_with = "lenient::or_default")]
    pub h2_count: u32,

    #[serde(default, alias = "h3", deserialize_with = "lenient::or_default")]
    pub h3_count: u32,

    #[serde(default, alias = "h4", deserialize_with = "lenient::or_default")]
    pub h4_count: u32,

    #[serde(default, alias = "h5", deserialize_with = "lenient::or_default")]
    pub h5_count: u32,

    #[serde(default, alias = "h6", deserialize_with = "lenient::or_default")]
    pub h6_count: u32,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub internal_links: u32,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub external_links: u32,

    /// Either a bare count (list endpoint) or the embedded detail list
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub broken_links: BrokenLinksField,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub has_login_form: bool,

    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record {
    /// Creates a record with only identity, URL and status set
    pub fn new(id: impl Into<RecordId>, url: impl Into<String>, status: CrawlStatus) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            status,
            html_version: String::new(),
            title: String::new(),
            h1_count: 0,
            h2_count: 0,
            h3_count: 0,
            h4_count: 0,
            h5_count: 0,
            h6_count: 0,
            internal_links: 0,
            external_links: 0,
            broken_links: BrokenLinksField::default(),
            has_login_form: false,
            created_at: None,
        }
    }

    /// Number of broken links, whichever shape the payload used
    pub fn broken_link_count(&self) -> u64 {
        self.broken_links.count()
    }

    /// Heading counts h1 through h6
    pub fn heading_counts(&self) -> [u32; 6] {
        [
            self.h1_count,
            self.h2_count,
            self.h3_count,
            self.h4_count,
            self.h5_count,
            self.h6_count,
        ]
    }

    /// Internal plus external link count
    pub fn total_links(&self) -> u64 {
        u64::from(self.internal_links) + u64::from(self.external_links)
    }
}
