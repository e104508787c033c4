//! Package catalog: categories of installable entries
//!
//! The catalog is read from a JSON file and is immutable for the rest of the
//! session. Each category carries its [`Backend`] tag, resolved once at load
//! time from an explicit `backend` field or from the category naming
//! convention (`AUR`, `FLATPAK`).
//!
//! ```json
//! {
//!   "preselect": true,
//!   "categories": [
//!     { "id": "Editors", "description": "Text editors",
//!       "packages": ["vim|Vim editor", "nano|Nano editor"] },
//!     { "id": "FLATPAK", "description": "Flatpak apps",
//!       "packages": ["flathub:org.gimp.GIMP|GIMP"] }
//!   ]
//! }
//! ```

use crate::error::{ArchPkgError, Result};
use crate::types::Backend;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming a catalog file
pub const CATALOG_ENV: &str = "ARCHPKG_CATALOG";

/// Fallback catalog locations, searched in order
pub const DEFAULT_CATALOG_PATHS: &[&str] = &["/etc/archpkg/catalog.json", "catalog.json"];

/// Menu identifiers the session reserves for its own actions
pub const RESERVED_IDS: &[&str] = &["INSTALL", "CLEAR", "QUIT"];

/// One installable item within a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    /// Package name, AUR package name, or Flatpak ref (`[remote:]appid`)
    pub id: String,
    pub description: String,
}

impl PackageEntry {
    /// Build an entry; surrounding whitespace is stripped from the id
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into().trim().to_string(),
            description: description.into(),
        }
    }

    /// Parse an `id|description` catalog line.
    ///
    /// Returns `None` for blank lines and `#` comments. A line without a
    /// `|` uses the identifier as its own description.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (id, description) = match line.split_once('|') {
            Some((id, desc)) => (id.trim(), desc.trim()),
            None => (line, line),
        };
        if id.is_empty() {
            return None;
        }
        Some(Self::new(id, description))
    }
}

/// A named, ordered group of entries sharing one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub description: String,
    pub backend: Backend,
    pub entries: Vec<PackageEntry>,
}

impl Category {
    /// Build a category whose backend follows the naming convention
    pub fn new(id: impl Into<String>, description: impl Into<String>, entries: Vec<PackageEntry>) -> Self {
        let id = id.into();
        let backend = Backend::from_category_id(&id);
        Self {
            id,
            description: description.into(),
            backend,
            entries,
        }
    }

    /// Override the backend tag
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id.as_str())
    }
}

/// Flatpak application reference split into remote and app id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatpakRef<'a> {
    /// Explicit remote, `None` means the default remote
    pub remote: Option<&'a str>,
    pub app_id: &'a str,
}

impl<'a> FlatpakRef<'a> {
    /// Split `remote:appid`; a bare app id has no remote
    pub fn parse(id: &'a str) -> Self {
        match id.split_once(':') {
            Some((remote, app_id)) => Self {
                remote: Some(remote),
                app_id,
            },
            None => Self {
                remote: None,
                app_id: id,
            },
        }
    }

    /// Remote to install from, falling back to `default`
    pub fn remote_or<'b>(&self, default: &'b str) -> &'b str
    where
        'a: 'b,
    {
        self.remote.unwrap_or(default)
    }
}

/// Catalog file as stored on disk
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub preselect: Option<bool>,
    pub categories: Vec<CategoryFile>,
}

/// Category record as stored on disk
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryFile {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub backend: Option<Backend>,
    #[serde(default)]
    pub packages: Vec<String>,
}

/// Ordered, validated set of categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
    preselect: Option<bool>,
}

impl Catalog {
    /// Build and validate a catalog from categories
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        let catalog = Self {
            categories,
            preselect: None,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Convert the on-disk representation, skipping blank and comment lines
    pub fn from_file_repr(file: CatalogFile) -> Result<Self> {
        let categories = file
            .categories
            .into_iter()
            .map(|c| {
                let entries = c.packages.iter().filter_map(|l| PackageEntry::parse(l)).collect();
                let description = if c.description.trim().is_empty() {
                    c.id.clone()
                } else {
                    c.description
                };
                let category = Category::new(c.id, description, entries);
                match c.backend {
                    Some(backend) => category.with_backend(backend),
                    None => category,
                }
            })
            .collect();

        let mut catalog = Self::new(categories)?;
        catalog.preselect = file.preselect;
        Ok(catalog)
    }

    /// Parse a catalog from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| ArchPkgError::config(format!("invalid catalog JSON: {}", e)))?;
        Self::from_file_repr(file)
    }

    /// Load a catalog from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ArchPkgError::config_missing(format!("{}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json(&content).map_err(|e| match e {
            ArchPkgError::Config(msg) => ArchPkgError::config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        info!(
            "Loaded catalog {} ({} categories, {} entries)",
            path.display(),
            catalog.len(),
            catalog.entry_count()
        );
        Ok(catalog)
    }

    /// Preselect flag stored in the catalog file, if any
    pub fn preselect(&self) -> Option<bool> {
        self.preselect
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }

    /// Identifiers that occur in more than one category.
    ///
    /// Such identifiers share a single selection flag.
    pub fn shared_ids(&self) -> Vec<String> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for category in &self.categories {
            for id in category.ids() {
                *seen.entry(id).or_default() += 1;
            }
        }
        let mut shared: Vec<String> = seen
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id.to_string())
            .collect();
        shared.sort();
        shared
    }

    fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(ArchPkgError::config("catalog has no categories"));
        }

        let mut category_ids = HashSet::new();
        for category in &self.categories {
            let id = category.id.trim();
            if id.is_empty() {
                return Err(ArchPkgError::config("category with empty id"));
            }
            if RESERVED_IDS.contains(&id) {
                return Err(ArchPkgError::config(format!(
                    "category id '{}' is reserved",
                    id
                )));
            }
            if !category_ids.insert(id) {
                return Err(ArchPkgError::config(format!("duplicate category '{}'", id)));
            }

            let mut entry_ids = HashSet::new();
            for entry in &category.entries {
                if entry.id.trim().is_empty() {
                    return Err(ArchPkgError::config(format!(
                        "empty package id in category '{}'",
                        id
                    )));
                }
                if !entry_ids.insert(entry.id.as_str()) {
                    return Err(ArchPkgError::config(format!(
                        "duplicate package '{}' in category '{}'",
                        entry.id, id
                    )));
                }
                if category.backend == Backend::Flatpak {
                    let fref = FlatpakRef::parse(&entry.id);
                    if fref.app_id.is_empty() || fref.remote == Some("") {
                        return Err(ArchPkgError::config(format!(
                            "malformed Flatpak ref '{}' in category '{}'",
                            entry.id, id
                        )));
                    }
                }
            }
        }

        for id in self.shared_ids() {
            debug!("Package '{}' appears in several categories and shares one selection", id);
        }

        Ok(())
    }
}

/// Find the catalog file to load.
///
/// Order: explicit path, `$ARCHPKG_CATALOG`, then [`DEFAULT_CATALOG_PATHS`].
/// An explicit path is returned even if it does not exist so the load error
/// names it.
pub fn locate_catalog(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(CATALOG_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    DEFAULT_CATALOG_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
        .ok_or_else(|| {
            ArchPkgError::config_missing(format!(
                "none of --catalog, ${}, {} exists",
                CATALOG_ENV,
                DEFAULT_CATALOG_PATHS.join(", ")
            ))
        })
}
