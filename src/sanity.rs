//! Pre-flight sanity checks for runtime environment
//!
//! This module verifies the system environment before the session starts:
//! - Required runtime binaries are present
//! - stdin/stdout are attached to a terminal for the dialogs
//!
//! Any failure is an [`ArchPkgError::PrerequisiteMissing`], fatal at startup.

use crate::error::{ArchPkgError, Result};
use crate::runner::CommandRunner;
use std::io::IsTerminal;
use tracing::{debug, info};

/// Result of environment verification
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SanityCheckResult {
    pub missing_binaries: Vec<String>,
    pub has_terminal: bool,
}

impl SanityCheckResult {
    /// Returns true if all checks passed
    pub fn is_ok(&self) -> bool {
        self.missing_binaries.is_empty() && self.has_terminal
    }

    /// Convert into an error listing what is missing
    pub fn into_result(self) -> Result<()> {
        if self.is_ok() {
            return Ok(());
        }
        let mut problems = Vec::new();
        if !self.has_terminal {
            problems.push("an interactive terminal".to_string());
        }
        for binary in &self.missing_binaries {
            problems.push(format!("{} (install: pacman -S {})", binary, package_for_binary(binary)));
        }
        Err(ArchPkgError::prerequisite(problems.join(", ")))
    }
}

/// Binaries needed to install anything at all
const REQUIRED_BINARIES: &[&str] = &["pacman"];

/// Map binary names to their Arch Linux package names
fn package_for_binary(binary: &str) -> &str {
    match binary {
        "pacman" => "pacman",
        "sudo" => "sudo",
        other => other,
    }
}

/// Perform all sanity checks and return the result.
///
/// `sudo` is required only when not running as root; binary checks are
/// skipped in dry-run mode since nothing is executed.
pub fn verify_environment(runner: &dyn CommandRunner, is_root: bool, dry_run: bool) -> SanityCheckResult {
    let mut missing = Vec::new();

    if !dry_run {
        let sudo: &[&str] = if is_root { &[] } else { &["sudo"] };
        for binary in REQUIRED_BINARIES.iter().chain(sudo) {
            if !runner.exists(binary) {
                missing.push((*binary).to_string());
            } else {
                debug!("Found required binary {}", binary);
            }
        }
    }

    SanityCheckResult {
        missing_binaries: missing,
        has_terminal: std::io::stdin().is_terminal() && std::io::stdout().is_terminal(),
    }
}

/// Verify the environment, failing with `PrerequisiteMissing`
pub fn run_preflight_checks(runner: &dyn CommandRunner, dry_run: bool) -> Result<()> {
    debug!("Running pre-flight sanity checks...");
    let is_root = nix::unistd::geteuid().is_root();
    verify_environment(runner, is_root, dry_run).into_result()?;
    info!("Pre-flight checks passed: root={}", is_root);
    Ok(())
}
