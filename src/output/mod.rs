//! Terminal output for the CLI
//!
//! This module handles:
//! - Rendering the visible list page with sort markers and a page footer
//! - Rendering the detail card with headings, link split and broken links
//! - Summarising record counts per status

pub mod stats;
mod table;

pub use stats::{format_summary, print_summary, StatusSummary};
pub use table::{format_created, format_detail, format_list};
