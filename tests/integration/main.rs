//! Integration tests for the crawl dashboard
//!
//! `api_tests` drive the HTTP client against wiremock; `list_tests` and
//! `detail_tests` drive the polling sessions against an in-memory API with
//! paused tokio time.

mod api_tests;
mod detail_tests;
mod list_tests;
