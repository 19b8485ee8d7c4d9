//! Broken links discovered while analysing a record

use crate::model::lenient;
use crate::model::record::RecordId;
use serde::{Deserialize, Serialize};

/// One unreachable or erroring link found on a crawled page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLink {
    #[serde(default)]
    pub id: Option<i64>,

    /// Record this link was found on
    #[serde(default)]
    pub url_id: Option<RecordId>,

    /// The linked URL
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub link: String,

    /// HTTP status observed when probing; 0 when the probe never got a response
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: u16,
}

impl BrokenLink {
    pub fn new(url_id: impl Into<RecordId>, link: impl Into<String>, status: u16) -> Self {
        Self {
            id: None,
            url_id: Some(url_id.into()),
            link: link.into(),
            status,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Short label for the probe outcome
    pub fn status_label(&self) -> String {
        if self.status == 0 {
            "unreachable".to_string()
        } else {
            self.status.to_string()
        }
    }
}

/// The `broken_links` field of a record payload
///
/// The list endpoint sends a bare count, while the detail endpoint may embed
/// the full list instead. Both shapes are kept as received; the detail
/// view-model decides whether a follow-up fetch is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BrokenLinksField {
    List(Vec<BrokenLink>),
    Count(u64),
}

impl Default for BrokenLinksField {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl BrokenLinksField {
    /// Number of broken links in either shape
    pub fn count(&self) -> u64 {
        match self {
            Self::List(links) => links.len() as u64,
            Self::Count(count) => *count,
        }
    }

    /// The embedded list, if the payload carried one
    pub fn embedded(&self) -> Option<&[BrokenLink]> {
        match self {
            Self::List(links) => Some(links),
            Self::Count(_) => None,
        }
    }
}
