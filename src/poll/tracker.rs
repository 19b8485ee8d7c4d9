//! Fetch ordering for one view
//!
//! Every fetch takes a ticket when it is issued. Only the most recently
//! issued ticket may apply its result, so a slow response that arrives after
//! a newer request was started is dropped. Closing the tracker (view
//! unmounted) rejects every ticket.

/// Token identifying one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Issues tickets in start order and decides which one is current
#[derive(Debug, Default)]
pub struct FetchTracker {
    issued: u64,
    closed: bool,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier one
    pub fn issue(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Returns true if results for `ticket` may still be applied
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        !self.closed && ticket.0 == self.issued
    }

    /// Supersedes any outstanding ticket without issuing a new fetch
    pub fn invalidate(&mut self) {
        self.issued += 1;
    }

    /// Rejects all tickets from now on
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
