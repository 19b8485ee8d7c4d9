//! Broken-link shape normalization for detail payloads

use crate::model::{BrokenLink, BrokenLinksField, Record};

/// What the detail view knows about a record's broken links
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokenLinkDetail {
    /// The full list is known
    Loaded(Vec<BrokenLink>),

    /// Only a non-zero count is known; the list has to be fetched separately
    Pending { count: u64 },
}

impl BrokenLinkDetail {
    pub fn from_field(field: BrokenLinksField) -> Self {
        match field {
            BrokenLinksField::List(links) => Self::Loaded(links),
            BrokenLinksField::Count(0) => Self::Loaded(Vec::new()),
            BrokenLinksField::Count(count) => Self::Pending { count },
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            Self::Loaded(links) => links.len() as u64,
            Self::Pending { count } => *count,
        }
    }

    pub fn needs_fetch(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Splits the broken-link detail off a fetched record
///
/// The returned record always carries the bare count, so list and detail
/// payloads look the same downstream.
pub fn normalize(mut record: Record) -> (Record, BrokenLinkDetail) {
    let detail = BrokenLinkDetail::from_field(std::mem::take(&mut record.broken_links));
    record.broken_links = BrokenLinksField::Count(detail.count());
    (record, detail)
}
