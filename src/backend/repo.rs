//! Official repository backend (pacman)

use super::{BackendInstaller, BackendOutcome};
use crate::runner::{CommandRunner, CommandSpec};
use crate::types::Backend;
use tracing::info;

/// Installs repository packages with a single pacman transaction
#[derive(Debug, Clone, Copy, Default)]
pub struct RepoInstaller;

impl BackendInstaller for RepoInstaller {
    fn backend(&self) -> Backend {
        Backend::Repo
    }

    fn install(&mut self, runner: &dyn CommandRunner, ids: &[String]) -> BackendOutcome {
        if ids.is_empty() {
            return BackendOutcome::Skipped;
        }

        let spec = CommandSpec::pacman_install(ids.iter().cloned());
        match runner.run(&spec).and_then(|status| status.ensure_success(&spec)) {
            Ok(()) => {
                info!("Installed {} repository package(s)", ids.len());
                BackendOutcome::Installed(ids.len())
            }
            Err(e) => BackendOutcome::Failed(e),
        }
    }
}
