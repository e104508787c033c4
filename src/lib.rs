//! archpkg library
//!
//! Interactive package selection and multi-backend installation for Arch
//! Linux: browse a catalog by category, tick packages, then install them with
//! pacman, an AUR helper, or Flatpak.

pub mod backend;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod dialog;
pub mod error;
pub mod planner;
pub mod presenter;
pub mod process_guard;
pub mod runner;
pub mod sanity;
pub mod selection;
pub mod session;
pub mod theme;
pub mod types;
pub mod ui;

// Re-export main types for convenience
pub use backend::{
    BackendHandle, BackendInstaller, BackendOutcome, BackendReport, FlatpakRemote, InstallReport,
    Installer,
};
pub use catalog::{Catalog, Category, FlatpakRef, PackageEntry};
pub use config::Settings;
pub use dialog::{ChecklistItem, ChecklistResult, Dialog, MenuItem, MenuResult};
pub use error::{ArchPkgError, Result};
pub use planner::{plan, InstallPlan};
pub use presenter::{present, PresentOutcome};
pub use runner::{CommandRunner, CommandSpec, CommandStatus, SystemRunner};
pub use selection::SelectionStore;
pub use session::{Session, SessionEnd, SessionState};
pub use types::{AurHelper, Backend};
pub use ui::TerminalDialog;
