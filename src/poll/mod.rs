//! Polling controller for the record list
//!
//! # Components
//!
//! - `FetchTracker` / `FetchTicket`: last-issued-wins ordering of fetch results
//! - `LoadState` / `Notice`: load lifecycle and transient action messages
//! - `ListController`: synchronous state machine around the list view-model
//! - `ListSession`: tokio driver that mounts a controller, polls while jobs are
//!   active and runs user actions against the API

mod controller;
mod session;
mod state;
mod tracker;

pub use controller::ListController;
pub use session::{validate_submission, ListSession, ListSettings};
pub use state::{LoadState, Notice, Severity};
pub use tracker::{FetchTicket, FetchTracker};
