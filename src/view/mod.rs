//! List view-model
//!
//! Pure, I/O-free derivation of the record table: filtering, stable sorting,
//! pagination with clamping, and the bulk-action selection set.

mod filter;
mod list;
mod selection;
mod sort;

pub use filter::{FilterMatcher, LoginFormFilter, RecordFilter};
pub use list::ListView;
pub use selection::Selection;
pub use sort::{SortDirection, SortKey, SortSpec};
