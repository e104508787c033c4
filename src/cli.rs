use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// archpkg - pick and install Arch, AUR and Flatpak packages from a catalog
#[derive(Parser, Debug)]
#[command(name = "archpkg")]
#[command(about = "Pick packages from a catalog and install them with pacman, an AUR helper or Flatpak")]
#[command(version)]
pub struct Cli {
    /// Catalog file (JSON). Defaults to $ARCHPKG_CATALOG, /etc/archpkg/catalog.json, ./catalog.json
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Do not preselect entries the first time a category is opened
    #[arg(long, global = true)]
    pub no_preselect: bool,

    /// Dry-run mode: log installer commands instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the interactive package picker (default)
    Run,
    /// Validate a catalog file
    Validate {
        /// Catalog to validate (overrides --catalog)
        catalog: Option<PathBuf>,
    },
    /// Print every category with its backend and entries
    List {
        /// Catalog to list (overrides --catalog)
        catalog: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
