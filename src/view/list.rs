//! The record list view-model
//!
//! `ListView` owns the last fetched record set plus the user's filter, sort,
//! page and selection state, and derives the exact page to render from them.
//!
//! Invariants kept after every mutation:
//! - the page index stays within `0..page_count()` (or 0 when nothing matches)
//! - the selection only holds ids present in the current record set

use crate::model::{Record, RecordId};
use crate::view::filter::RecordFilter;
use crate::view::selection::Selection;
use crate::view::sort::{SortDirection, SortKey, SortSpec};
use std::cell::OnceCell;
use std::collections::HashSet;
use std::ops::Range;

/// Filter → sort → paginate → select projection of a record set
#[derive(Debug, Clone)]
pub struct ListView {
    records: Vec<Record>,
    filter: RecordFilter,
    sort: SortSpec,
    page: usize,
    page_size: usize,
    selection: Selection,

    /// Indices into `records` that pass the filter, in sort order.
    /// Reset whenever records, filter or sort change.
    ordered: OnceCell<Vec<usize>>,
}

impl ListView {
    /// Creates an empty view; a zero page size is raised to 1
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            filter: RecordFilter::default(),
            sort: SortSpec::default(),
            page: 0,
            page_size: page_size.max(1),
            selection: Selection::new(),
            ordered: OnceCell::new(),
        }
    }

    // ===== Records =====

    /// The raw record set, in server order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Replaces the working set with a fresh server snapshot
    ///
    /// The selection is intersected with the new ids and the page is clamped.
    /// Returns the number of selected ids that disappeared.
    pub fn replace_records(&mut self, records: Vec<Record>) -> usize {
        self.records = records;

        let present: HashSet<&RecordId> = self.records.iter().map(|r| &r.id).collect();
        let dropped = self.selection.retain_present(&present);
        if dropped > 0 {
            tracing::debug!("Dropped {} selected ids no longer present", dropped);
        }

        self.invalidate();
        self.clamp_page();
        dropped
    }

    /// Returns true if any record is still queued or running
    pub fn has_active_records(&self) -> bool {
        self.records.iter().any(|r| r.status.is_active())
    }

    // ===== Filtering =====

    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    /// Replaces the filter and returns to the first page
    pub fn set_filter(&mut self, filter: RecordFilter) {
        self.filter = filter;
        self.page = 0;
        self.invalidate();
    }

    /// Sets only the global search term and returns to the first page
    pub fn set_search(&mut self, needle: impl Into<String>) {
        let filter = RecordFilter {
            search: needle.into(),
            ..self.filter.clone()
        };
        self.set_filter(filter);
    }

    // ===== Sorting =====

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.sort = SortSpec::new(key, direction);
        self.invalidate();
        self.clamp_page();
    }

    /// Column-header behaviour: ascending on a new column, flip on the same one
    pub fn toggle_sort(&mut self, key: SortKey) {
        let direction = if self.sort.key == key {
            self.sort.direction.flipped()
        } else {
            SortDirection::Asc
        };
        self.set_sort(key, direction);
    }

    // ===== Pagination =====

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of records passing the filter
    pub fn matching_count(&self) -> usize {
        self.ordered().len()
    }

    /// `ceil(matching_count / page_size)`
    pub fn page_count(&self) -> usize {
        self.matching_count().div_ceil(self.page_size)
    }

    /// Moves to page `n`, clamping to the last page that exists
    pub fn set_page(&mut self, n: usize) {
        self.page = n;
        self.clamp_page();
    }

    /// Changes the page size (minimum 1) and returns to the first page
    pub fn set_page_size(&mut self, n: usize) {
        self.page_size = n.max(1);
        self.page = 0;
    }

    /// Positions (within the sorted, filtered set) shown on the current page
    pub fn visible_range(&self) -> Range<usize> {
        let total = self.matching_count();
        let start = (self.page * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    /// The ordered slice of records to render
    pub fn visible_page(&self) -> Vec<&Record> {
        let range = self.visible_range();
        self.ordered()[range]
            .iter()
            .map(|&i| &self.records[i])
            .collect()
    }

    /// Every record passing the filter, in sort order
    pub fn sorted_filtered(&self) -> Vec<&Record> {
        self.ordered().iter().map(|&i| &self.records[i]).collect()
    }

    // ===== Selection =====

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selects or deselects one record
    ///
    /// Ids not in the current record set are never selected. Returns whether
    /// the id is selected afterwards.
    pub fn set_selected(&mut self, id: &RecordId, selected: bool) -> bool {
        if selected {
            if self.record(id).is_none() {
                tracing::debug!("Refusing to select unknown record {}", id);
                return false;
            }
            self.selection.insert(id.clone());
            true
        } else {
            self.selection.remove(id);
            false
        }
    }

    /// Flips the selection of one record; returns the new state
    pub fn toggle_selected(&mut self, id: &RecordId) -> bool {
        let selected = self.selection.contains(id);
        self.set_selected(id, !selected)
    }

    /// Selects or deselects every record on the visible page
    pub fn select_page(&mut self, selected: bool) {
        let ids: Vec<RecordId> = self.visible_page().iter().map(|r| r.id.clone()).collect();
        for id in ids {
            if selected {
                self.selection.insert(id);
            } else {
                self.selection.remove(&id);
            }
        }
    }

    /// Returns true if the page is non-empty and fully selected
    pub fn is_page_selected(&self) -> bool {
        let page = self.visible_page();
        !page.is_empty() && page.iter().all(|r| self.selection.contains(&r.id))
    }

    /// Removes the given ids from the selection
    pub fn deselect(&mut self, ids: &[RecordId]) {
        for id in ids {
            self.selection.remove(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ===== Internals =====

    fn ordered(&self) -> &[usize] {
        self.ordered.get_or_init(|| {
            let matcher = self.filter.matcher();
            let mut indices: Vec<usize> = self
                .records
                .iter()
                .enumerate()
                .filter(|(_, record)| matcher.matches(record))
                .map(|(i, _)| i)
                .collect();
            self.sort.sort_indices(&self.records, &mut indices);
            indices
        })
    }

    fn invalidate(&mut self) {
        self.ordered = OnceCell::new();
    }

    fn clamp_page(&mut self) {
        let last = self.page_count().saturating_sub(1);
        if self.page > last {
            tracing::debug!("Clamping page {} to {}", self.page, last);
            self.page = last;
        }
    }
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(10)
    }
}
