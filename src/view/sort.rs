//! Record ordering
//!
//! Sorting is stable: records with equal keys keep their relative order from
//! the filtered collection. Numbers compare numerically, text compares
//! case-insensitively, and absent values sort before any present value.
//! Descending order reverses the comparator, so absent values come last there.

use crate::model::{Record, RecordId};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sortable record columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Id,
    Url,
    Title,
    HtmlVersion,
    Status,
    InternalLinks,
    ExternalLinks,
    BrokenLinks,
    HasLoginForm,
    CreatedAt,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Url => "url",
            Self::Title => "title",
            Self::HtmlVersion => "html_version",
            Self::Status => "status",
            Self::InternalLinks => "internal_links",
            Self::ExternalLinks => "external_links",
            Self::BrokenLinks => "broken_links",
            Self::HasLoginForm => "has_login_form",
            Self::CreatedAt => "created_at",
        }
    }

    pub fn all() -> [Self; 10] {
        [
            Self::Id,
            Self::Url,
            Self::Title,
            Self::HtmlVersion,
            Self::Status,
            Self::InternalLinks,
            Self::ExternalLinks,
            Self::BrokenLinks,
            Self::HasLoginForm,
            Self::CreatedAt,
        ]
    }

    /// Extracts this column's value from a record
    fn value<'a>(&self, record: &'a Record) -> SortValue<'a> {
        match self {
            Self::Id => match &record.id {
                RecordId::Number(n) => SortValue::Number(*n),
                RecordId::Text(s) => SortValue::Text(s),
            },
            Self::Url => SortValue::Text(&record.url),
            Self::Title => SortValue::Text(&record.title),
            Self::HtmlVersion => SortValue::Text(&record.html_version),
            Self::Status => SortValue::Text(record.status.as_str()),
            Self::InternalLinks => SortValue::Number(i64::from(record.internal_links)),
            Self::ExternalLinks => SortValue::Number(i64::from(record.external_links)),
            Self::BrokenLinks => {
                SortValue::Number(i64::try_from(record.broken_link_count()).unwrap_or(i64::MAX))
            }
            Self::HasLoginForm => SortValue::Number(i64::from(record.has_login_form)),
            Self::CreatedAt => record
                .created_at
                .map(|ts| SortValue::Number(ts.timestamp_millis()))
                .unwrap_or(SortValue::Missing),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        match wanted.as_str() {
            "internal" => return Ok(Self::InternalLinks),
            "external" => return Ok(Self::ExternalLinks),
            "broken" => return Ok(Self::BrokenLinks),
            "login" | "login_form" => return Ok(Self::HasLoginForm),
            "html" => return Ok(Self::HtmlVersion),
            "created" => return Ok(Self::CreatedAt),
            _ => {}
        }
        Self::all()
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| format!("unknown sort column '{}'", s))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Column plus direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::Title,
            direction: SortDirection::Asc,
        }
    }
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Compares two records under this ordering
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let ordering = compare_values(&self.key.value(a), &self.key.value(b));
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Stable-sorts indices into `records`
    pub fn sort_indices(&self, records: &[Record], indices: &mut [usize]) {
        indices.sort_by(|&a, &b| self.compare(&records[a], &records[b]));
    }
}

/// A single column value prepared for comparison
#[derive(Debug, Clone, Copy)]
enum SortValue<'a> {
    Missing,
    Number(i64),
    Text(&'a str),
}

fn compare_values(a: &SortValue<'_>, b: &SortValue<'_>) -> Ordering {
    match (a, b) {
        (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
        (SortValue::Missing, _) => Ordering::Less,
        (_, SortValue::Missing) => Ordering::Greater,
        (SortValue::Number(x), SortValue::Number(y)) => x.cmp(y),
        (SortValue::Text(x), SortValue::Text(y)) => compare_text_ci(x, y),
        // Mixed id shapes: numeric ids first
        (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
        (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
    }
}

fn compare_text_ci(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
