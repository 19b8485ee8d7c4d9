//! Crawl service API access
//!
//! This module contains everything that crosses the network boundary:
//! - `CrawlApi`: the trait views depend on
//! - `HttpCrawlApi`: the reqwest-backed implementation
//! - Wire envelopes for list, broken-link and bulk endpoints

mod client;
mod payload;
mod traits;

pub use client::{build_http_client, HttpCrawlApi};
pub use traits::CrawlApi;
