//! AUR backend
//!
//! Needs a helper. Installed helpers are probed in [`AurHelper::PREFERENCE`]
//! order; if none is present the preferred helper is acquired, first from
//! the repositories, then by building it from source.

use super::provision::{provision_chain, Provisioner, RepoPackage, SourceBuild};
use super::{BackendInstaller, BackendOutcome};
use crate::error::Result;
use crate::runner::{CommandRunner, CommandSpec};
use crate::types::{AurHelper, Backend};
use tracing::{debug, info};

/// Installs AUR packages through yay or paru
#[derive(Debug, Clone, Default)]
pub struct AurInstaller {
    helper: Option<AurHelper>,
}

impl AurInstaller {
    /// Helper discovered or acquired so far
    pub fn helper(&self) -> Option<AurHelper> {
        self.helper
    }

    /// First installed helper in preference order
    pub fn probe(runner: &dyn CommandRunner) -> Option<AurHelper> {
        AurHelper::PREFERENCE
            .into_iter()
            .find(|helper| runner.exists(helper.binary()))
    }

    /// Acquisition strategies for `helper`, in the order they are tried
    pub fn acquisition_chain(helper: AurHelper) -> Vec<Box<dyn Provisioner>> {
        vec![
            Box::new(RepoPackage::new(helper.binary())),
            Box::new(SourceBuild::new(helper)),
        ]
    }

    /// Find or acquire a helper, remembering it for later installs
    pub fn ensure_helper(&mut self, runner: &dyn CommandRunner) -> Result<AurHelper> {
        if let Some(helper) = self.helper {
            return Ok(helper);
        }

        if let Some(helper) = Self::probe(runner) {
            debug!("Found AUR helper {}", helper);
            self.helper = Some(helper);
            return Ok(helper);
        }

        let wanted = AurHelper::PREFERENCE[0];
        info!("No AUR helper installed, acquiring {}", wanted);
        provision_chain(&Self::acquisition_chain(wanted), runner)?;
        self.helper = Some(wanted);
        Ok(wanted)
    }

    /// `<helper> -S --needed --noconfirm <packages...>`, run as the user
    pub fn install_command(helper: AurHelper, ids: &[String]) -> CommandSpec {
        CommandSpec::new(helper.binary())
            .args(["-S", "--needed", "--noconfirm"])
            .args(ids.iter().cloned())
    }
}

impl BackendInstaller for AurInstaller {
    fn backend(&self) -> Backend {
        Backend::Aur
    }

    fn install(&mut self, runner: &dyn CommandRunner, ids: &[String]) -> BackendOutcome {
        if ids.is_empty() {
            return BackendOutcome::Skipped;
        }

        let helper = match self.ensure_helper(runner) {
            Ok(helper) => helper,
            Err(e) => return BackendOutcome::Failed(e),
        };

        let spec = Self::install_command(helper, ids);
        match runner.run(&spec).and_then(|status| status.ensure_success(&spec)) {
            Ok(()) => {
                info!("Installed {} AUR package(s) with {}", ids.len(), helper);
                BackendOutcome::Installed(ids.len())
            }
            Err(e) => BackendOutcome::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_command_is_unprivileged() {
        let spec = AurInstaller::install_command(AurHelper::Paru, &["yay-extra".to_string()]);
        assert_eq!(spec.program, "paru");
        assert_eq!(spec.args, vec!["-S", "--needed", "--noconfirm", "yay-extra"]);
        assert!(!spec.privileged);
    }

    #[test]
    fn test_acquisition_chain_order() {
        let names: Vec<String> = AurInstaller::acquisition_chain(AurHelper::Yay)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(
            names,
            vec!["pacman package 'yay'", "source build of yay-bin"]
        );
    }
}
