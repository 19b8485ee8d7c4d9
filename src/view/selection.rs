//! Bulk-action selection set

use crate::model::RecordId;
use std::collections::{BTreeSet, HashSet};

/// Record ids chosen for a bulk action
///
/// Kept in id order so bulk request bodies are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<RecordId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    pub fn insert(&mut self, id: RecordId) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: &RecordId) -> bool {
        self.ids.remove(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drops every id not in `present`
    ///
    /// Returns the number of ids removed.
    pub fn retain_present(&mut self, present: &HashSet<&RecordId>) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| present.contains(id));
        before - self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordId> {
        self.ids.iter()
    }

    /// Selected ids as an owned list, in id order
    pub fn to_vec(&self) -> Vec<RecordId> {
        self.ids.iter().cloned().collect()
    }
}
