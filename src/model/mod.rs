//! Data model for records exchanged with the crawl API
//!
//! # Components
//!
//! - `Record`: one crawled URL with its status and analysis payload
//! - `RecordId`: opaque record identity (numeric or text)
//! - `CrawlStatus`: job lifecycle (queued, running, done, error)
//! - `BrokenLink` / `BrokenLinksField`: broken-link details and the two shapes
//!   the API uses to report them

mod broken_link;
pub mod lenient;
mod record;
mod status;

// Re-export main types
pub use broken_link::{BrokenLink, BrokenLinksField};
pub use record::{Record, RecordId};
pub use status::CrawlStatus;
