//! Tool provisioning strategies
//!
//! A missing tool is obtained by trying an ordered list of [`Provisioner`]s
//! and stopping at the first that succeeds.

use crate::error::{ArchPkgError, Result};
use crate::runner::{CommandRunner, CommandSpec};
use crate::types::AurHelper;
use tracing::{info, warn};

/// Build dependencies for `makepkg`
const BUILD_TOOLCHAIN: &[&str] = &["base-devel", "git"];

/// One way of obtaining a tool
pub trait Provisioner {
    /// Short description for logs and error messages
    fn name(&self) -> String;

    fn provision(&self, runner: &dyn CommandRunner) -> Result<()>;
}

/// Install a package from the official repositories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPackage {
    pub package: String,
}

impl RepoPackage {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }
}

impl Provisioner for RepoPackage {
    fn name(&self) -> String {
        format!("pacman package '{}'", self.package)
    }

    fn provision(&self, runner: &dyn CommandRunner) -> Result<()> {
        let spec = CommandSpec::pacman_install([self.package.as_str()]);
        runner.run(&spec)?.ensure_success(&spec)
    }
}

/// Build an AUR helper's `-bin` package with makepkg.
///
/// The clone lives in a temporary directory that is removed when the attempt
/// ends, whether it succeeded or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceBuild {
    pub helper: AurHelper,
}

impl SourceBuild {
    pub fn new(helper: AurHelper) -> Self {
        Self { helper }
    }
}

impl Provisioner for SourceBuild {
    fn name(&self) -> String {
        format!("source build of {}-bin", self.helper.binary())
    }

    fn provision(&self, runner: &dyn CommandRunner) -> Result<()> {
        if nix::unistd::geteuid().is_root() {
            warn!("makepkg refuses to run as root; building {} will likely fail", self.helper);
        }

        let toolchain = CommandSpec::pacman_install(BUILD_TOOLCHAIN.iter().copied());
        runner.run(&toolchain)?.ensure_success(&toolchain)?;

        let scratch = tempfile::Builder::new().prefix("archpkg-").tempdir()?;
        let checkout = scratch.path().join(format!("{}-bin", self.helper.binary()));
        let checkout_str = checkout.to_string_lossy().to_string();

        let clone = CommandSpec::new("git")
            .args(["clone", "--depth", "1"])
            .arg(self.helper.source_repo())
            .arg(checkout_str);
        let build = CommandSpec::new("makepkg")
            .args(["-si", "--noconfirm"])
            .current_dir(&checkout);

        let result = runner
            .run(&clone)
            .and_then(|status| status.ensure_success(&clone))
            .and_then(|()| runner.run(&build))
            .and_then(|status| status.ensure_success(&build));

        if let Err(e) = scratch.close() {
            warn!("Failed to remove build directory: {}", e);
        }
        result
    }
}

/// Try each provisioner in order, stopping at the first success.
///
/// Returns the name of the provisioner that worked, or
/// [`ArchPkgError::BackendUnavailable`] listing every failure.
pub fn provision_chain(
    chain: &[Box<dyn Provisioner>],
    runner: &dyn CommandRunner,
) -> Result<String> {
    let mut failures = Vec::new();
    for provisioner in chain {
        let name = provisioner.name();
        info!("Trying {}", name);
        match provisioner.provision(runner) {
            Ok(()) => {
                info!("{} succeeded", name);
                return Ok(name);
            }
            Err(e) => {
                warn!("{} failed: {}", name, e);
                failures.push(format!("{}: {}", name, e));
            }
        }
    }
    Err(ArchPkgError::backend_unavailable(failures.join("; ")))
}
