//! External command execution
//!
//! Every installer invocation goes through a [`CommandRunner`]. The backends
//! describe *what* to run with a [`CommandSpec`]; the runner decides *how*
//! (sudo, process isolation, dry-run). Tests substitute a recording runner.

use crate::error::{ArchPkgError, Result};
use crate::process_guard::{CommandProcessGroup, TrackedChild};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// A command to run, independent of how privileges are obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Needs root; the runner adds `sudo` when we are not root
    pub privileged: bool,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            privileged: false,
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// `pacman -S --needed --noconfirm <packages...>` as root
    pub fn pacman_install<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("pacman")
            .args(["-S", "--needed", "--noconfirm"])
            .args(packages)
            .privileged()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.privileged {
            write!(f, "[root] ")?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit status of a finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    pub success: bool,
    /// Exit code (None if terminated by signal)
    pub code: Option<i32>,
}

impl CommandStatus {
    pub const OK: CommandStatus = CommandStatus {
        success: true,
        code: Some(0),
    };

    /// Turn a failed status into an [`ArchPkgError::InstallFailure`]
    pub fn ensure_success(&self, spec: &CommandSpec) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(ArchPkgError::install(format!(
                "`{}` exited with code {}",
                spec,
                self.code.map_or_else(|| "signal".to_string(), |c| c.to_string())
            )))
        }
    }
}

/// Executes installer commands
pub trait CommandRunner {
    /// Run with the terminal attached and wait for the exit status
    fn run(&self, spec: &CommandSpec) -> Result<CommandStatus>;

    /// Run non-interactively and return stdout; a failed status is an error
    fn capture(&self, spec: &CommandSpec) -> Result<String>;

    /// Whether `program` can be found on PATH
    fn exists(&self, program: &str) -> bool;
}

/// Runner that spawns real processes
#[derive(Debug, Clone)]
pub struct SystemRunner {
    dry_run: bool,
    is_root: bool,
}

impl SystemRunner {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            is_root: nix::unistd::geteuid().is_root(),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Build the `std::process::Command`, inserting sudo where needed
    pub fn build_command(&self, spec: &CommandSpec) -> Command {
        let mut cmd = if spec.privileged && !self.is_root {
            let mut sudo = Command::new("sudo");
            sudo.arg(&spec.program);
            sudo
        } else {
            Command::new(&spec.program)
        };
        cmd.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandStatus> {
        if self.dry_run {
            info!("DRY RUN: {}", spec);
            return Ok(CommandStatus::OK);
        }

        info!("Running: {}", spec);
        let mut child = self
            .build_command(spec)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .with_parent_death_signal()
            .spawn()
            .map_err(|e| ArchPkgError::install(format!("failed to start `{}`: {}", spec, e)))?;

        let _tracked = TrackedChild::register(child.id());
        let status = child.wait()?;

        let status = CommandStatus {
            success: status.success(),
            code: status.code(),
        };
        if !status.success {
            warn!("`{}` failed with code {:?}", spec, status.code);
        }
        Ok(status)
    }

    fn capture(&self, spec: &CommandSpec) -> Result<String> {
        if self.dry_run {
            info!("DRY RUN: {}", spec);
            return Ok(String::new());
        }

        debug!("Capturing: {}", spec);
        let child = self
            .build_command(spec)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .in_new_process_group()
            .spawn()
            .map_err(|e| ArchPkgError::install(format!("failed to start `{}`: {}", spec, e)))?;

        let _tracked = TrackedChild::register(child.id());
        let output = child.wait_with_output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(ArchPkgError::install(format!(
                "`{}` failed (exit code {}): {}",
                spec,
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    fn exists(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacman_install_spec() {
        let spec = CommandSpec::pacman_install(["vim", "git"]);
        assert_eq!(spec.program, "pacman");
        assert_eq!(spec.args, vec!["-S", "--needed", "--noconfirm", "vim", "git"]);
        assert!(spec.privileged);
        assert_eq!(spec.to_string(), "[root] pacman -S --needed --noconfirm vim git");
    }

    #[test]
    fn test_build_command_adds_sudo_when_not_root() {
        let runner = SystemRunner {
            dry_run: false,
            is_root: false,
        };
        let cmd = runner.build_command(&CommandSpec::pacman_install(["vim"]));
        assert_eq!(cmd.get_program(), "sudo");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(args[0], "pacman");

        let root = SystemRunner {
            dry_run: false,
            is_root: true,
        };
        let cmd = root.build_command(&CommandSpec::pacman_install(["vim"]));
        assert_eq!(cmd.get_program(), "pacman");

        let cmd = runner.build_command(&CommandSpec::new("yay").arg("-S"));
        assert_eq!(cmd.get_program(), "yay");
    }

    #[test]
    fn test_dry_run_executes_nothing() {
        let runner = SystemRunner::new(true);
        let spec = CommandSpec::new("this_binary_definitely_does_not_exist_12345");
        assert_eq!(runner.run(&spec).expect("dry run"), CommandStatus::OK);
        assert_eq!(runner.capture(&spec).expect("dry run"), "");
    }

    #[test]
    fn test_run_reports_exit_status() {
        let runner = SystemRunner::new(false);
        let ok = runner.run(&CommandSpec::new("true")).expect("spawn true");
        assert!(ok.success);

        let spec = CommandSpec::new("false");
        let failed = runner.run(&spec).expect("spawn false");
        assert!(!failed.success);
        assert!(matches!(
            failed.ensure_success(&spec),
            Err(ArchPkgError::InstallFailure(_))
        ));
    }

    #[test]
    fn test_capture_returns_stdout() {
        let runner = SystemRunner::new(false);
        let out = runner
            .capture(&CommandSpec::new("echo").arg("flathub"))
            .expect("echo");
        assert_eq!(out.trim(), "flathub");
    }

    #[test]
    fn test_missing_program_is_install_failure() {
        let runner = SystemRunner::new(false);
        let err = runner
            .run(&CommandSpec::new("this_binary_definitely_does_not_exist_12345"))
            .unwrap_err();
        assert!(matches!(err, ArchPkgError::InstallFailure(_)));
        assert!(!runner.exists("this_binary_definitely_does_not_exist_12345"));
        assert!(runner.exists("sh"));
    }
}
