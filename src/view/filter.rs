//! Record filtering
//!
//! A global search term matches title or URL; column filters each narrow the
//! set further and are ANDed together. Text comparisons are case-insensitive
//! substring matches, the status filter is an exact match.

use crate::model::{CrawlStatus, Record};
use std::str::FromStr;

/// Tri-state filter on login-form detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginFormFilter {
    #[default]
    Any,
    Present,
    Absent,
}

impl LoginFormFilter {
    fn accepts(&self, has_login_form: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Present => has_login_form,
            Self::Absent => !has_login_form,
        }
    }
}

impl FromStr for LoginFormFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "all" => Ok(Self::Any),
            "yes" | "present" => Ok(Self::Present),
            "no" | "absent" => Ok(Self::Absent),
            other => Err(format!(
                "unknown login-form filter '{}', expected any, yes or no",
                other
            )),
        }
    }
}

/// User-controlled filter inputs for the record list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Matches title OR URL
    pub search: String,
    pub title: String,
    pub url: String,
    pub html_version: String,
    pub status: Option<CrawlStatus>,
    pub login_form: LoginFormFilter,
}

impl RecordFilter {
    /// Filter with only the global search term set
    pub fn search(needle: impl Into<String>) -> Self {
        Self {
            search: needle.into(),
            ..Self::default()
        }
    }

    /// Returns true if no predicate is active
    pub fn is_empty(&self) -> bool {
        self.matcher().is_empty()
    }

    /// Tests a single record
    ///
    /// Prefer [`RecordFilter::matcher`] when filtering many records.
    pub fn matches(&self, record: &Record) -> bool {
        self.matcher().matches(record)
    }

    /// Prepares lowercase needles once for repeated matching
    pub fn matcher(&self) -> FilterMatcher {
        FilterMatcher {
            search: normalize_needle(&self.search),
            title: normalize_needle(&self.title),
            url: normalize_needle(&self.url),
            html_version: normalize_needle(&self.html_version),
            status: self.status,
            login_form: self.login_form,
        }
    }
}

/// A `RecordFilter` with its needles trimmed and lowercased
#[derive(Debug, Clone)]
pub struct FilterMatcher {
    search: Option<String>,
    title: Option<String>,
    url: Option<String>,
    html_version: Option<String>,
    status: Option<CrawlStatus>,
    login_form: LoginFormFilter,
}

impl FilterMatcher {
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.title.is_none()
            && self.url.is_none()
            && self.html_version.is_none()
            && self.status.is_none()
            && self.login_form == LoginFormFilter::Any
    }

    pub fn matches(&self, record: &Record) -> bool {
        if let Some(needle) = &self.search {
            if !contains_ci(&record.title, needle) && !contains_ci(&record.url, needle) {
                return false;
            }
        }

        if let Some(needle) = &self.title {
            if !contains_ci(&record.title, needle) {
                return false;
            }
        }

        if let Some(needle) = &self.url {
            if !contains_ci(&record.url, needle) {
                return false;
            }
        }

        if let Some(needle) = &self.html_version {
            if !contains_ci(&record.html_version, needle) {
                return false;
            }
        }

        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }

        self.login_form.accepts(record.has_login_form)
    }
}

fn normalize_needle(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Case-insensitive substring test; `needle` must already be lowercase
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
