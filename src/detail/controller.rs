//! Detail view state machine
//!
//! A detail fetch and its broken-link follow-up are two independent request
//! streams, each with its own [`FetchTracker`]. A record payload that embeds
//! the list settles both at once; a bare non-zero count makes
//! [`DetailController::apply_detail`] hand out a ticket for the follow-up.

use crate::detail::normalize::{normalize, BrokenLinkDetail};
use crate::model::{BrokenLink, CrawlStatus, Record, RecordId};
use crate::poll::{FetchTicket, FetchTracker, LoadState, Notice};
use crate::ApiError;

/// Result of applying a detail response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailUpdate {
    /// Superseded or closed; nothing changed
    Stale,

    /// State changed, no further request needed
    Applied,

    /// State changed and the broken-link list must be fetched with this ticket
    NeedsBrokenLinks(FetchTicket),
}

#[derive(Debug)]
pub struct DetailController {
    id: RecordId,
    record: Option<Record>,
    load_state: LoadState,
    error: Option<String>,
    notice: Option<Notice>,
    broken_link_count: u64,
    broken_links: Option<Vec<BrokenLink>>,
    broken_loading: bool,
    broken_error: Option<String>,
    tracker: FetchTracker,
    links_tracker: FetchTracker,
}

impl DetailController {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            record: None,
            load_state: LoadState::Idle,
            error: None,
            notice: None,
            broken_link_count: 0,
            broken_links: None,
            broken_loading: false,
            broken_error: None,
            tracker: FetchTracker::new(),
            links_tracker: FetchTracker::new(),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Last successfully loaded record
    pub fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    pub fn status(&self) -> Option<CrawlStatus> {
        self.record.as_ref().map(|r| r.status)
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn broken_link_count(&self) -> u64 {
        self.broken_link_count
    }

    /// The broken-link list, once known
    pub fn broken_links(&self) -> Option<&[BrokenLink]> {
        self.broken_links.as_deref()
    }

    pub fn broken_loading(&self) -> bool {
        self.broken_loading
    }

    pub fn broken_error(&self) -> Option<&str> {
        self.broken_error.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        let ticket = self.tracker.issue();
        self.load_state = LoadState::Loading;
        tracing::debug!("Detail fetch #{} for {} started", ticket.sequence(), self.id);
        ticket
    }

    pub fn apply_detail(
        &mut self,
        ticket: FetchTicket,
        result: Result<Record, ApiError>,
    ) -> DetailUpdate {
        if !self.tracker.is_current(ticket) {
            tracing::debug!("Discarding stale detail response #{}", ticket.sequence());
            return DetailUpdate::Stale;
        }

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Detail load for {} failed: {}", self.id, e);
                self.error = Some(e.to_string());
                self.load_state = LoadState::Error;
                return DetailUpdate::Applied;
            }
        };

        let (record, links) = normalize(record);
        self.record = Some(record);
        self.error = None;
        self.load_state = LoadState::Settled;
        self.broken_link_count = links.count();

        match links {
            BrokenLinkDetail::Loaded(list) => {
                // An embedded list supersedes any follow-up still in flight
                self.links_tracker.invalidate();
                self.broken_links = Some(list);
                self.broken_loading = false;
                self.broken_error = None;
                DetailUpdate::Applied
            }
            BrokenLinkDetail::Pending { count } => {
                let links_ticket = self.links_tracker.issue();
                self.broken_loading = true;
                tracing::debug!(
                    "Record {} reports {} broken links, fetching list",
                    self.id,
                    count
                );
                DetailUpdate::NeedsBrokenLinks(links_ticket)
            }
        }
    }

    /// Applies the broken-link follow-up; a failure clears the list
    pub fn apply_broken_links(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<BrokenLink>, ApiError>,
    ) -> bool {
        if !self.links_tracker.is_current(ticket) {
            tracing::debug!("Discarding stale broken-link response #{}", ticket.sequence());
            return false;
        }

        self.broken_loading = false;
        match result {
            Ok(links) => {
                self.broken_links = Some(links);
                self.broken_error = None;
            }
            Err(e) => {
                tracing::warn!("Broken-link load for {} failed: {}", self.id, e);
                self.broken_links = None;
                self.broken_error = Some(e.to_string());
            }
        }
        true
    }

    /// Optimistically marks the record running ahead of a rerun request
    ///
    /// Any detail fetch in flight is superseded so a pre-rerun snapshot cannot
    /// undo the flip. Returns false if no record is loaded yet.
    pub fn mark_rerun(&mut self) -> bool {
        let Some(record) = self.record.as_mut() else {
            return false;
        };

        record.status = CrawlStatus::Running;
        self.tracker.invalidate();
        if self.load_state == LoadState::Loading {
            self.load_state = LoadState::Settled;
        }
        true
    }

    pub fn needs_poll(&self) -> bool {
        !self.tracker.is_closed() && self.status().is_some_and(|s| s.is_active())
    }

    pub fn close(&mut self) {
        self.tracker.close();
        self.links_tracker.close();
    }

    pub fn is_closed(&self) -> bool {
        self.tracker.is_closed()
    }
}
