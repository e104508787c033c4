//! Install planning
//!
//! Partitions the current selections into one list per backend.
//!
//! # Design
//!
//! - **Pure logic**: no I/O, no side effects, recomputed on every install
//! - **Catalog order**: category order, then entry order; never map order
//! - **No duplicates**: an identifier shared by two categories of the same
//!   backend is listed once, at its first position

use crate::catalog::Catalog;
use crate::selection::SelectionStore;
use crate::types::Backend;

/// Backend-partitioned lists of identifiers to install
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallPlan {
    pub repo: Vec<String>,
    pub aur: Vec<String>,
    pub flatpak: Vec<String>,
}

impl InstallPlan {
    pub fn list(&self, backend: Backend) -> &[String] {
        match backend {
            Backend::Repo => &self.repo,
            Backend::Aur => &self.aur,
            Backend::Flatpak => &self.flatpak,
        }
    }

    fn list_mut(&mut self, backend: Backend) -> &mut Vec<String> {
        match backend {
            Backend::Repo => &mut self.repo,
            Backend::Aur => &mut self.aur,
            Backend::Flatpak => &mut self.flatpak,
        }
    }

    pub fn total(&self) -> usize {
        self.repo.len() + self.aur.len() + self.flatpak.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Review text: per-backend counts followed by the identifiers
    pub fn review_text(&self) -> String {
        let mut text = String::new();
        for backend in [Backend::Repo, Backend::Aur, Backend::Flatpak] {
            text.push_str(&format!("{}: {}\n", backend.label(), self.list(backend).len()));
        }
        for backend in [Backend::Repo, Backend::Aur, Backend::Flatpak] {
            let ids = self.list(backend);
            if !ids.is_empty() {
                text.push_str(&format!("\n{}:\n  {}\n", backend.label(), ids.join(" ")));
            }
        }
        text
    }
}

/// Build the install plan from the catalog and current selections
pub fn plan(catalog: &Catalog, store: &SelectionStore) -> InstallPlan {
    let mut plan = InstallPlan::default();
    for category in catalog.categories() {
        for entry in &category.entries {
            let id = entry.id.as_str();
            if id.is_empty() || id.starts_with('#') || !store.is_selected(id) {
                continue;
            }
            let list = plan.list_mut(category.backend);
            if !list.iter().any(|existing| existing == id) {
                list.push(id.to_string());
            }
        }
    }
    plan
}
