//! Flatpak backend
//!
//! Unlike the other backends every app is its own install call, and one
//! failing app does not stop the rest.

use super::provision::{Provisioner, RepoPackage};
use super::{BackendInstaller, BackendOutcome};
use crate::catalog::FlatpakRef;
use crate::error::Result;
use crate::runner::{CommandRunner, CommandSpec};
use crate::types::Backend;
use tracing::{debug, info, warn};

/// A Flatpak remote registered on demand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatpakRemote {
    pub name: String,
    pub url: String,
}

impl Default for FlatpakRemote {
    fn default() -> Self {
        Self {
            name: "flathub".to_string(),
            url: "https://dl.flathub.org/repo/flathub.flatpakrepo".to_string(),
        }
    }
}

/// Installs Flatpak apps, provisioning flatpak and its default remote first
#[derive(Debug, Clone)]
pub struct FlatpakInstaller {
    remote: FlatpakRemote,
    newly_installed: bool,
}

impl FlatpakInstaller {
    pub fn new(remote: FlatpakRemote) -> Self {
        Self {
            remote,
            newly_installed: false,
        }
    }

    /// Whether flatpak itself was installed during this session
    pub fn newly_installed(&self) -> bool {
        self.newly_installed
    }

    /// Install the flatpak tool if it is not on PATH
    pub fn ensure_tool(&mut self, runner: &dyn CommandRunner) -> Result<()> {
        if runner.exists("flatpak") {
            return Ok(());
        }
        info!("flatpak not found, installing it");
        RepoPackage::new("flatpak").provision(runner)?;
        self.newly_installed = true;
        Ok(())
    }

    /// Register the default remote unless a remote of that name exists
    pub fn ensure_remote(&self, runner: &dyn CommandRunner) -> Result<()> {
        let list = CommandSpec::new("flatpak").args(["remotes", "--columns=name"]);
        match runner.capture(&list) {
            Ok(out) if out.lines().any(|l| l.trim() == self.remote.name) => {
                debug!("Flatpak remote '{}' already registered", self.remote.name);
                return Ok(());
            }
            Ok(_) => {}
            Err(e) => warn!("Could not list Flatpak remotes: {}", e),
        }

        let add = CommandSpec::new("flatpak")
            .args(["remote-add", "--if-not-exists"])
            .arg(&self.remote.name)
            .arg(&self.remote.url)
            .privileged();
        runner.run(&add)?.ensure_success(&add)?;
        info!("Registered Flatpak remote '{}'", self.remote.name);
        Ok(())
    }

    /// `flatpak install -y --noninteractive <remote> <appid>`
    pub fn install_command(&self, id: &str) -> CommandSpec {
        let fref = FlatpakRef::parse(id);
        CommandSpec::new("flatpak")
            .args(["install", "-y", "--noninteractive"])
            .arg(fref.remote_or(&self.remote.name))
            .arg(fref.app_id)
            .privileged()
    }
}

impl Default for FlatpakInstaller {
    fn default() -> Self {
        Self::new(FlatpakRemote::default())
    }
}

impl BackendInstaller for FlatpakInstaller {
    fn backend(&self) -> Backend {
        Backend::Flatpak
    }

    fn install(&mut self, runner: &dyn CommandRunner, ids: &[String]) -> BackendOutcome {
        if ids.is_empty() {
            return BackendOutcome::Skipped;
        }

        if let Err(e) = self.ensure_tool(runner) {
            return BackendOutcome::Failed(e);
        }
        if let Err(e) = self.ensure_remote(runner) {
            return BackendOutcome::Failed(e);
        }

        let mut failed = Vec::new();
        for id in ids {
            let spec = self.install_command(id);
            if let Err(e) = runner.run(&spec).and_then(|status| status.ensure_success(&spec)) {
                warn!("Flatpak app '{}' failed: {}", id, e);
                failed.push(id.clone());
            }
        }

        let installed = ids.len() - failed.len();
        info!("Installed {} of {} Flatpak app(s)", installed, ids.len());
        if failed.is_empty() {
            BackendOutcome::Installed(installed)
        } else {
            BackendOutcome::Partial { installed, failed }
        }
    }
}
