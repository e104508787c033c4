//! Selection bookkeeping for the interactive session
//!
//! `SelectionStore` holds one boolean per package identifier plus the set of
//! categories that have been opened. Identifiers are global: the same name in
//! two categories is one flag.
//!
//! # Preselection
//!
//! The first time a category is opened, entries that have never been decided
//! are initialised to the session's preselect flag. Existing decisions are
//! never overwritten, and later openings of the same category initialise
//! undecided entries to `false`.

use crate::catalog::Category;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Per-package selection state plus visited categories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    selected: HashMap<String, bool>,
    visited: HashSet<String>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is selected; undecided counts as not selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.get(id).copied().unwrap_or(false)
    }

    /// Explicit decision for `id`, `None` if never decided
    pub fn decision(&self, id: &str) -> Option<bool> {
        self.selected.get(id).copied()
    }

    pub fn set_selected(&mut self, id: &str, selected: bool) {
        self.selected.insert(id.to_string(), selected);
    }

    /// Deselect every known identifier.
    ///
    /// Visited categories stay visited, so preselection does not fire again.
    pub fn clear_all(&mut self) {
        for value in self.selected.values_mut() {
            *value = false;
        }
        debug!("Cleared {} selections", self.selected.len());
    }

    pub fn is_visited(&self, category_id: &str) -> bool {
        self.visited.contains(category_id)
    }

    pub fn mark_visited(&mut self, category_id: &str) {
        if self.visited.insert(category_id.to_string()) {
            debug!("Category '{}' visited for the first time", category_id);
        }
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Give every entry of `category` an explicit decision before rendering.
    ///
    /// Undecided entries become `preselect` on the first opening of the
    /// category and `false` afterwards. Returns the current state of each
    /// entry in category order.
    pub fn initialize_category(&mut self, category: &Category, preselect: bool) -> Vec<bool> {
        let default = preselect && !self.is_visited(&category.id);
        category
            .entries
            .iter()
            .map(|entry| *self.selected.entry(entry.id.clone()).or_insert(default))
            .collect()
    }

    /// Replace the decisions for `category` with exactly `chosen`.
    ///
    /// Every entry of the category is deselected, then the chosen ones that
    /// belong to the category are selected. Returns how many were selected.
    pub fn apply_choices<S: AsRef<str>>(&mut self, category: &Category, chosen: &[S]) -> usize {
        for id in category.ids() {
            self.set_selected(id, false);
        }
        let mut count = 0;
        for id in chosen {
            let id = id.as_ref();
            if category.ids().any(|known| known == id) {
                self.set_selected(id, true);
                count += 1;
            } else {
                debug!("Ignoring '{}' which is not part of category '{}'", id, category.id);
            }
        }
        count
    }

    /// Number of selected entries in `category`
    pub fn selected_in(&self, category: &Category) -> usize {
        category.ids().filter(|id| self.is_selected(id)).count()
    }

    /// Number of selected identifiers overall
    pub fn total_selected(&self) -> usize {
        self.selected.values().filter(|v| **v).count()
    }
}
