//! Runtime settings for a session
//!
//! Combines the catalog's own preferences with command-line overrides.

use crate::backend::FlatpakRemote;
use crate::catalog::Catalog;

/// Settings that stay fixed for the whole session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Preselect undecided entries on a category's first opening
    pub preselect: bool,
    /// Log commands instead of running them
    pub dry_run: bool,
    /// Remote used for Flatpak apps without a `remote:` qualifier
    pub flatpak_remote: FlatpakRemote,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preselect: true,
            dry_run: false,
            flatpak_remote: FlatpakRemote::default(),
        }
    }
}

impl Settings {
    /// Resolve settings: `--no-preselect` wins, then the catalog, then on
    pub fn resolve(catalog: &Catalog, no_preselect: bool, dry_run: bool) -> Self {
        Self {
            preselect: !no_preselect && catalog.preselect().unwrap_or(true),
            dry_run,
            ..Self::default()
        }
    }
}
