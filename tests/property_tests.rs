//! Property-Based Tests for archpkg
//!
//! These tests verify:
//! - Backend name parsing round-trips
//! - Planning is deterministic and follows catalog order
//! - Preselection only applies on a category's first opening
//! - Clearing keeps visited categories

use archpkg::{plan, Backend, Catalog, Category, PackageEntry, SelectionStore};
use proptest::prelude::*;
use strum::IntoEnumIterator;

// =============================================================================
// Backend Enum Property Tests
// =============================================================================

fn backend_strategy() -> impl Strategy<Value = Backend> {
    prop_oneof![Just(Backend::Repo), Just(Backend::Aur), Just(Backend::Flatpak)]
}

proptest! {
    /// Backend: to_string → parse round-trip is identity, in any case
    #[test]
    fn backend_roundtrip(backend in backend_strategy(), upper in any::<bool>()) {
        let s = backend.to_string();
        let s = if upper { s.to_uppercase() } else { s };
        let parsed: Backend = s.parse().expect("Should parse");
        prop_assert_eq!(backend, parsed);
    }
}

#[test]
fn backend_labels_are_distinct() {
    let labels: Vec<&str> = Backend::iter().map(|b| b.label()).collect();
    assert_eq!(labels.len(), 3);
    assert!(labels.iter().all(|l| !l.is_empty()));
    assert_ne!(labels[0], labels[1]);
    assert_ne!(labels[1], labels[2]);
}

// =============================================================================
// Planning Property Tests
// =============================================================================

/// A catalog of up to four categories drawing ids from a small shared pool,
/// so identifiers regularly appear in more than one category
fn catalog_strategy() -> impl Strategy<Value = Catalog> {
    let entries = prop::collection::vec(0usize..8, 1..6);
    prop::collection::vec((entries, backend_strategy()), 1..5).prop_map(|cats| {
        let categories = cats
            .into_iter()
            .enumerate()
            .map(|(i, (ids, backend))| {
                let mut seen = Vec::new();
                let entries = ids
                    .into_iter()
                    .filter(|n| {
                        let fresh = !seen.contains(n);
                        seen.push(*n);
                        fresh
                    })
                    .map(|n| PackageEntry::new(format!("pkg{}", n), format!("Package {}", n)))
                    .collect();
                Category::new(format!("Cat{}", i), format!("Category {}", i), entries)
                    .with_backend(backend)
            })
            .collect();
        Catalog::new(categories).expect("generated catalog is valid")
    })
}

fn selection_strategy() -> impl Strategy<Value = Vec<(usize, bool)>> {
    prop::collection::vec((0usize..8, any::<bool>()), 0..16)
}

fn store_from(decisions: &[(usize, bool)]) -> SelectionStore {
    let mut store = SelectionStore::new();
    for (n, selected) in decisions {
        store.set_selected(&format!("pkg{}", n), *selected);
    }
    store
}

proptest! {
    /// Same catalog and selections always give the same plan
    #[test]
    fn plan_is_deterministic(catalog in catalog_strategy(), decisions in selection_strategy()) {
        let store = store_from(&decisions);
        prop_assert_eq!(plan(&catalog, &store), plan(&catalog, &store.clone()));
    }

    /// Every planned id is selected, listed once, and belongs to its backend
    #[test]
    fn plan_contains_only_selected(catalog in catalog_strategy(), decisions in selection_strategy()) {
        let store = store_from(&decisions);
        let plan = plan(&catalog, &store);
        for backend in Backend::iter() {
            let list = plan.list(backend);
            for (i, id) in list.iter().enumerate() {
                prop_assert!(store.is_selected(id));
                prop_assert!(!list[i + 1..].contains(id));
                let owned = catalog
                    .categories()
                    .iter()
                    .any(|c| c.backend == backend && c.ids().any(|known| known == id));
                prop_assert!(owned);
            }
        }
    }

    /// Each backend list follows catalog order of first appearance
    #[test]
    fn plan_follows_catalog_order(catalog in catalog_strategy(), decisions in selection_strategy()) {
        let store = store_from(&decisions);
        let plan = plan(&catalog, &store);
        for backend in Backend::iter() {
            let mut expected: Vec<String> = Vec::new();
            for category in catalog.categories().iter().filter(|c| c.backend == backend) {
                for id in category.ids() {
                    if store.is_selected(id) && !expected.iter().any(|e| e == id) {
                        expected.push(id.to_string());
                    }
                }
            }
            prop_assert_eq!(plan.list(backend), expected.as_slice());
        }
    }

    /// An empty store never yields work
    #[test]
    fn empty_store_empty_plan(catalog in catalog_strategy()) {
        prop_assert!(plan(&catalog, &SelectionStore::new()).is_empty());
    }
}

// =============================================================================
// Selection Store Property Tests
// =============================================================================

proptest! {
    /// First opening shows undecided entries as the preselect flag and
    /// decided entries unchanged
    #[test]
    fn first_open_preselects_only_undecided(
        catalog in catalog_strategy(),
        decisions in selection_strategy(),
        preselect in any::<bool>(),
    ) {
        let mut store = store_from(&decisions);
        let category = &catalog.categories()[0];
        let before = store.clone();

        let shown = store.initialize_category(category, preselect);
        for (entry, checked) in category.entries.iter().zip(&shown) {
            let expected = before.decision(&entry.id).unwrap_or(preselect);
            prop_assert_eq!(*checked, expected);
            prop_assert_eq!(store.decision(&entry.id), Some(expected));
        }
    }

    /// Once visited, undecided entries start unchecked
    #[test]
    fn later_opens_never_preselect(catalog in catalog_strategy()) {
        let mut store = SelectionStore::new();
        let category = &catalog.categories()[0];
        store.mark_visited(&category.id);
        let shown = store.initialize_category(category, true);
        prop_assert!(shown.iter().all(|checked| !checked));
    }

    /// Applying choices selects exactly the chosen members of the category
    #[test]
    fn apply_choices_is_exact(
        catalog in catalog_strategy(),
        decisions in selection_strategy(),
        mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let mut store = store_from(&decisions);
        let category = &catalog.categories()[0];
        let chosen: Vec<&str> = category
            .ids()
            .zip(mask.iter())
            .filter(|(_, keep)| **keep)
            .map(|(id, _)| id)
            .collect();

        let count = store.apply_choices(category, &chosen);
        prop_assert_eq!(count, chosen.len());
        for id in category.ids() {
            prop_assert_eq!(store.is_selected(id), chosen.contains(&id));
        }
    }

    /// Clearing deselects everything but keeps visited categories
    #[test]
    fn clear_keeps_visited(
        catalog in catalog_strategy(),
        decisions in selection_strategy(),
    ) {
        let mut store = store_from(&decisions);
        for category in catalog.categories() {
            store.initialize_category(category, true);
            store.mark_visited(&category.id);
        }
        let visited = store.visited_count();

        store.clear_all();
        prop_assert_eq!(store.total_selected(), 0);
        prop_assert_eq!(store.visited_count(), visited);
        prop_assert!(plan(&catalog, &store).is_empty());

        for category in catalog.categories() {
            let shown = store.initialize_category(category, true);
            prop_assert!(shown.iter().all(|checked| !checked));
        }
    }
}
