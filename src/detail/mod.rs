//! Detail view-model for a single record
//!
//! # Components
//!
//! - `normalize`: folds the embedded-list and bare-count broken-link shapes
//!   into one `BrokenLinkDetail`
//! - `DetailController`: detail and broken-link load state, optimistic rerun
//! - `DetailSession`: tokio driver that polls while the record is pending

mod controller;
mod normalize;
mod session;

pub use controller::{DetailController, DetailUpdate};
pub use normalize::{normalize, BrokenLinkDetail};
pub use session::{DetailSession, DetailSettings};
