//! Backend installers
//!
//! One [`BackendInstaller`] per installation mechanism. The [`Installer`]
//! runs them in the fixed order repository → AUR → Flatpak. A failing backend
//! never stops the next one; each outcome is reported separately.

pub mod aur;
pub mod flatpak;
pub mod provision;
pub mod repo;

pub use aur::AurInstaller;
pub use flatpak::{FlatpakInstaller, FlatpakRemote};
pub use provision::{provision_chain, Provisioner, RepoPackage, SourceBuild};
pub use repo::RepoInstaller;

use crate::error::ArchPkgError;
use crate::planner::InstallPlan;
use crate::runner::CommandRunner;
use crate::types::{AurHelper, Backend};
use tracing::{info, warn};

/// Result of one backend's install step
#[derive(Debug)]
pub enum BackendOutcome {
    /// Nothing to install
    Skipped,
    /// All requested identifiers were installed
    Installed(usize),
    /// Some identifiers failed; the rest were installed
    Partial { installed: usize, failed: Vec<String> },
    /// The whole step failed
    Failed(ArchPkgError),
}

impl BackendOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Skipped | Self::Installed(_))
    }

    pub fn installed(&self) -> usize {
        match self {
            Self::Installed(n) => *n,
            Self::Partial { installed, .. } => *installed,
            Self::Skipped | Self::Failed(_) => 0,
        }
    }
}

/// Strategy for one installation mechanism
pub trait BackendInstaller {
    fn backend(&self) -> Backend;

    /// Install `ids`; an empty list is a successful no-op
    fn install(&mut self, runner: &dyn CommandRunner, ids: &[String]) -> BackendOutcome;
}

/// Runtime facts discovered while installing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendHandle {
    pub aur_helper: Option<AurHelper>,
    /// Flatpak was installed during this session (reboot recommended)
    pub flatpak_newly_installed: bool,
}

/// Outcome of one backend within an install run
#[derive(Debug)]
pub struct BackendReport {
    pub backend: Backend,
    pub requested: usize,
    pub outcome: BackendOutcome,
}

/// Outcomes of all three backends, in execution order
#[derive(Debug)]
pub struct InstallReport {
    pub backends: Vec<BackendReport>,
}

impl InstallReport {
    pub fn all_succeeded(&self) -> bool {
        self.backends.iter().all(|r| r.outcome.is_success())
    }

    pub fn installed(&self) -> usize {
        self.backends.iter().map(|r| r.outcome.installed()).sum()
    }

    pub fn report(&self, backend: Backend) -> Option<&BackendReport> {
        self.backends.iter().find(|r| r.backend == backend)
    }

    /// User-facing summary, one line per backend plus failure details
    pub fn summary(&self) -> String {
        let mut text = String::new();
        for report in &self.backends {
            let line = match &report.outcome {
                BackendOutcome::Skipped => "nothing to install".to_string(),
                BackendOutcome::Installed(n) => format!("{} of {} installed", n, report.requested),
                BackendOutcome::Partial { installed, failed } => format!(
                    "{} of {} installed, failed: {}",
                    installed,
                    report.requested,
                    failed.join(" ")
                ),
                BackendOutcome::Failed(err) => format!("FAILED: {}", err),
            };
            text.push_str(&format!("{}: {}\n", report.backend.label(), line));
        }
        text
    }
}

/// Runs the backends for an install plan
pub struct Installer {
    repo: RepoInstaller,
    aur: AurInstaller,
    flatpak: FlatpakInstaller,
}

impl Installer {
    pub fn new(remote: FlatpakRemote) -> Self {
        Self {
            repo: RepoInstaller,
            aur: AurInstaller::default(),
            flatpak: FlatpakInstaller::new(remote),
        }
    }

    pub fn handle(&self) -> BackendHandle {
        BackendHandle {
            aur_helper: self.aur.helper(),
            flatpak_newly_installed: self.flatpak.newly_installed(),
        }
    }

    /// Install every list of `plan`, repository first, then AUR, then Flatpak
    pub fn execute(&mut self, runner: &dyn CommandRunner, plan: &InstallPlan) -> InstallReport {
        let backends: [&mut dyn BackendInstaller; 3] =
            [&mut self.repo, &mut self.aur, &mut self.flatpak];

        let reports = backends
            .into_iter()
            .map(|installer| {
                let backend = installer.backend();
                let ids = plan.list(backend);
                info!("{}: {} requested", backend.label(), ids.len());
                let outcome = installer.install(runner, ids);
                if !outcome.is_success() {
                    warn!("{} did not complete: {:?}", backend.label(), outcome);
                }
                BackendReport {
                    backend,
                    requested: ids.len(),
                    outcome,
                }
            })
            .collect();

        InstallReport { backends: reports }
    }
}

impl Default for Installer {
    fn default() -> Self {
        Self::new(FlatpakRemote::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_classification() {
        assert!(BackendOutcome::Skipped.is_success());
        assert!(BackendOutcome::Installed(3).is_success());
        assert!(!BackendOutcome::Failed(ArchPkgError::install("x")).is_success());
        let partial = BackendOutcome::Partial {
            installed: 1,
            failed: vec!["org.app.Two".into()],
        };
        assert!(!partial.is_success());
        assert_eq!(partial.installed(), 1);
    }

    #[test]
    fn test_summary_lines() {
        let report = InstallReport {
            backends: vec![
                BackendReport {
                    backend: Backend::Repo,
                    requested: 2,
                    outcome: BackendOutcome::Installed(2),
                },
                BackendReport {
                    backend: Backend::Aur,
                    requested: 1,
                    outcome: BackendOutcome::Failed(ArchPkgError::backend_unavailable(
                        "no AUR helper",
                    )),
                },
                BackendReport {
                    backend: Backend::Flatpak,
                    requested: 0,
                    outcome: BackendOutcome::Skipped,
                },
            ],
        };
        let text = report.summary();
        assert!(text.contains("Repository packages: 2 of 2 installed"));
        assert!(text.contains("AUR packages: FAILED: Backend unavailable: no AUR helper"));
        assert!(text.contains("Flatpak apps: nothing to install"));
        assert!(!report.all_succeeded());
        assert_eq!(report.installed(), 2);
    }
}
