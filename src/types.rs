//! Type-safe tags for installation backends and AUR helpers
//!
//! Category names and helper binaries are resolved into these enums once,
//! at catalog-load or probe time, instead of being string-matched per entry.

use serde::Deserialize;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Installation mechanism a category routes its packages to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[derive(Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Backend {
    /// Official repositories via pacman
    #[default]
    Repo,
    /// AUR via a helper (yay/paru)
    Aur,
    /// Flatpak applications
    Flatpak,
}

impl Backend {
    /// Backend implied by a category identifier.
    ///
    /// A category named `AUR` routes to the AUR helper and one named
    /// `FLATPAK` to Flatpak (case-insensitive); every other name is a
    /// repository category.
    pub fn from_category_id(id: &str) -> Self {
        if id.eq_ignore_ascii_case("aur") {
            Self::Aur
        } else if id.eq_ignore_ascii_case("flatpak") {
            Self::Flatpak
        } else {
            Self::Repo
        }
    }

    /// Human label used in review and report text
    pub const fn label(self) -> &'static str {
        match self {
            Self::Repo => "Repository packages",
            Self::Aur => "AUR packages",
            Self::Flatpak => "Flatpak apps",
        }
    }
}

/// Supported AUR helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum AurHelper {
    Yay,
    Paru,
}

impl AurHelper {
    /// Probe order when looking for an installed helper
    pub const PREFERENCE: [AurHelper; 2] = [AurHelper::Yay, AurHelper::Paru];

    /// Binary name on PATH (also the repository package name)
    pub fn binary(self) -> &'static str {
        self.into()
    }

    /// AUR git repository of the prebuilt `-bin` package
    pub fn source_repo(self) -> String {
        format!("https://aur.archlinux.org/{}-bin.git", self.binary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_backend_from_category_id() {
        assert_eq!(Backend::from_category_id("AUR"), Backend::Aur);
        assert_eq!(Backend::from_category_id("aur"), Backend::Aur);
        assert_eq!(Backend::from_category_id("FLATPAK"), Backend::Flatpak);
        assert_eq!(Backend::from_category_id("Flatpak"), Backend::Flatpak);
        assert_eq!(Backend::from_category_id("Editors"), Backend::Repo);
        assert_eq!(Backend::from_category_id("AUR-extras"), Backend::Repo);
    }

    #[test]
    fn test_backend_parse_and_display() {
        for backend in Backend::iter() {
            let parsed: Backend = backend.to_string().parse().expect("should parse");
            assert_eq!(parsed, backend);
        }
        assert_eq!("FlatPak".parse::<Backend>().ok(), Some(Backend::Flatpak));
        assert!("snap".parse::<Backend>().is_err());
    }

    #[test]
    fn test_backend_deserializes_lowercase() {
        let backend: Backend = serde_json::from_str("\"flatpak\"").expect("lowercase name");
        assert_eq!(backend, Backend::Flatpak);
        assert!(serde_json::from_str::<Backend>("\"snap\"").is_err());
    }

    #[test]
    fn test_helper_preference_and_binary() {
        assert_eq!(AurHelper::PREFERENCE, [AurHelper::Yay, AurHelper::Paru]);
        assert_eq!(AurHelper::Yay.binary(), "yay");
        assert_eq!(AurHelper::Paru.binary(), "paru");
        assert_eq!(
            AurHelper::Paru.source_repo(),
            "https://aur.archlinux.org/paru-bin.git"
        );
    }
}
