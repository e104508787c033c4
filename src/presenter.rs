//! Category checklist presentation
//!
//! Bridges the catalog and the selection store to the [`Dialog`]: builds the
//! checklist for one category, then feeds the user's answer back.

use crate::catalog::Category;
use crate::dialog::{ChecklistItem, ChecklistResult, Dialog};
use crate::error::Result;
use crate::selection::SelectionStore;
use tracing::{debug, info};

/// What happened to a presented category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    /// User confirmed; the number of entries now selected in the category
    Confirmed(usize),
    Cancelled,
}

/// Build the checklist rows for `category`, applying preselection.
///
/// After this call every entry of the category has an explicit decision.
pub fn checklist_items(
    store: &mut SelectionStore,
    category: &Category,
    preselect: bool,
) -> Vec<ChecklistItem> {
    let states = store.initialize_category(category, preselect);
    category
        .entries
        .iter()
        .zip(states)
        .map(|(entry, checked)| ChecklistItem::new(&entry.id, &entry.description, checked))
        .collect()
}

/// Render `category` and ingest the result.
///
/// A confirmed checklist replaces the category's decisions; a cancelled one
/// leaves the store as it was after initialisation. Either way the category
/// is marked visited, including when the dialog itself fails.
pub fn present(
    dialog: &mut dyn Dialog,
    store: &mut SelectionStore,
    category: &Category,
    preselect: bool,
) -> Result<PresentOutcome> {
    let items = checklist_items(store, category, preselect);
    let title = format!("{} ({})", category.description, category.backend.label());
    debug!("Presenting category '{}' with {} entries", category.id, items.len());

    let result = dialog.checklist(&title, &items);
    store.mark_visited(&category.id);

    match result? {
        ChecklistResult::Confirmed(chosen) => {
            let count = store.apply_choices(category, &chosen);
            info!("Category '{}': {} of {} selected", category.id, count, items.len());
            Ok(PresentOutcome::Confirmed(count))
        }
        ChecklistResult::Cancelled => {
            debug!("Category '{}' cancelled, selections unchanged", category.id);
            Ok(PresentOutcome::Cancelled)
        }
    }
}
