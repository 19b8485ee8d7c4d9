//! List polling state machine
//!
//! `ListController` is the synchronous core of a mounted list view. It never
//! performs I/O: the session issues a ticket with [`ListController::begin_fetch`],
//! runs the request, and hands the outcome back to
//! [`ListController::apply_fetch`], which drops it unless the ticket is still
//! the newest one.
//!
//! ```text
//! Idle ──begin──▶ Loading ──ok──▶ Settled ─┐
//!                    ▲     └─err─▶ Error  ─┤ any record queued/running:
//!                    └─────────────────────┘ fetch again after the interval
//! ```

use crate::model::Record;
use crate::poll::state::{LoadState, Notice};
use crate::poll::tracker::{FetchTicket, FetchTracker};
use crate::view::ListView;
use crate::ApiError;

/// Load state, error and notice bookkeeping around a [`ListView`]
#[derive(Debug)]
pub struct ListController {
    view: ListView,
    load_state: LoadState,
    error: Option<String>,
    notice: Option<Notice>,
    tracker: FetchTracker,
}

impl ListController {
    pub fn new(page_size: usize) -> Self {
        Self {
            view: ListView::new(page_size),
            load_state: LoadState::Idle,
            error: None,
            notice: None,
            tracker: FetchTracker::new(),
        }
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ListView {
        &mut self.view
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Message of the last failed load, cleared by the next success
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
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

    /// Starts a fetch, superseding any still in flight
    pub fn begin_fetch(&mut self) -> FetchTicket {
        let ticket = self.tracker.issue();
        self.load_state = LoadState::Loading;
        tracing::debug!("List fetch #{} started", ticket.sequence());
        ticket
    }

    /// Applies a fetch outcome if `ticket` is still current
    ///
    /// On success the record set is replaced (selection intersected, page
    /// clamped) and the error cleared. On failure the last records stay and
    /// the error message is stored. Returns false for stale or post-close
    /// results, which leave every piece of state untouched.
    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Record>, ApiError>,
    ) -> bool {
        if !self.tracker.is_current(ticket) {
            tracing::debug!("Discarding stale list response #{}", ticket.sequence());
            return false;
        }

        match result {
            Ok(records) => {
                tracing::debug!(
                    "List fetch #{} settled with {} records",
                    ticket.sequence(),
                    records.len()
                );
                self.view.replace_records(records);
                self.error = None;
                self.load_state = LoadState::Settled;
            }
            Err(e) => {
                tracing::warn!("List load failed: {}", e);
                self.error = Some(e.to_string());
                self.load_state = LoadState::Error;
            }
        }
        true
    }

    /// Returns true if a timed re-fetch should be scheduled
    pub fn needs_poll(&self) -> bool {
        !self.tracker.is_closed() && self.view.has_active_records()
    }

    /// Stops accepting results; called when the view goes away
    pub fn close(&mut self) {
        self.tracker.close();
    }

    pub fn is_closed(&self) -> bool {
        self.tracker.is_closed()
    }
}
