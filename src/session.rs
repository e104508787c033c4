//! Session controller
//!
//! Owns the selection state for one interactive run and drives the dialogs.
//!
//! # State Flow
//!
//! ```text
//! Browsing ──category──▶ CategoryOpen ──▶ Browsing
//!    │
//!    ├──INSTALL (nothing selected)──▶ Browsing
//!    ├──INSTALL──▶ Reviewing ──no──▶ Browsing
//!    │                 └──yes──▶ Installing ──failure──▶ Browsing
//!    │                                └──success──▶ PostInstallPrompt ──▶ Exited | Browsing
//!    ├──CLEAR──▶ Browsing
//!    └──QUIT──▶ Exited
//! ```

use crate::backend::{Installer, InstallReport};
use crate::catalog::Catalog;
use crate::config::Settings;
use crate::dialog::{Dialog, MenuItem, MenuResult};
use crate::error::{ArchPkgError, Result};
use crate::planner::{plan, InstallPlan};
use crate::presenter::present;
use crate::runner::{CommandRunner, CommandSpec};
use crate::selection::SelectionStore;
use tracing::{debug, info, warn};

/// Main menu action ids
pub const MENU_INSTALL: &str = "INSTALL";
pub const MENU_CLEAR: &str = "CLEAR";
pub const MENU_QUIT: &str = "QUIT";

const APP_TITLE: &str = "Package Installer";

/// How the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// User quit from the menu
    Quit,
    /// User left after a successful install
    Finished,
    /// A reboot was requested after Flatpak was installed
    Reboot,
}

/// Controller states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Browsing,
    /// Index into the catalog's categories
    CategoryOpen(usize),
    Reviewing(InstallPlan),
    Installing(InstallPlan),
    /// Holds the install summary shown in the prompt
    PostInstallPrompt(String),
    Exited(SessionEnd),
}

/// One interactive run over a catalog
pub struct Session<'a> {
    catalog: &'a Catalog,
    settings: Settings,
    store: SelectionStore,
    installer: Installer,
    dialog: &'a mut dyn Dialog,
    runner: &'a dyn CommandRunner,
    state: SessionState,
}

impl<'a> Session<'a> {
    pub fn new(
        catalog: &'a Catalog,
        settings: Settings,
        dialog: &'a mut dyn Dialog,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        let installer = Installer::new(settings.flatpak_remote.clone());
        Self {
            catalog,
            settings,
            store: SelectionStore::new(),
            installer,
            dialog,
            runner,
            state: SessionState::Browsing,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn installer(&self) -> &Installer {
        &self.installer
    }

    /// Run until the user exits
    pub fn run(&mut self) -> Result<SessionEnd> {
        info!(
            "Session started: {} categories, preselect={}, dry_run={}",
            self.catalog.len(),
            self.settings.preselect,
            self.settings.dry_run
        );
        loop {
            if let SessionState::Exited(end) = *self.step()? {
                info!("Session ended: {:?}", end);
                return Ok(end);
            }
        }
    }

    /// Perform one transition and return the new state
    pub fn step(&mut self) -> Result<&SessionState> {
        let current = std::mem::replace(&mut self.state, SessionState::Browsing);
        let next = match current {
            SessionState::Browsing => self.browse()?,
            SessionState::CategoryOpen(index) => self.open_category(index)?,
            SessionState::Reviewing(plan) => self.review(plan)?,
            SessionState::Installing(plan) => self.install(&plan)?,
            SessionState::PostInstallPrompt(summary) => self.post_install(&summary)?,
            SessionState::Exited(end) => SessionState::Exited(end),
        };
        debug!("Session state -> {:?}", next);
        self.state = next;
        Ok(&self.state)
    }

    /// Main menu rows: one per category, then the actions
    pub fn menu_items(&self) -> Vec<MenuItem> {
        let mut items: Vec<MenuItem> = self
            .catalog
            .categories()
            .iter()
            .map(|c| {
                MenuItem::new(
                    &c.id,
                    format!(
                        "{} ({}/{})",
                        c.description,
                        self.store.selected_in(c),
                        c.entries.len()
                    ),
                )
            })
            .collect();
        items.push(MenuItem::new(MENU_INSTALL, "Install selected packages"));
        items.push(MenuItem::new(MENU_CLEAR, "Clear all selections"));
        items.push(MenuItem::new(MENU_QUIT, "Quit"));
        items
    }

    fn browse(&mut self) -> Result<SessionState> {
        let items = self.menu_items();
        let title = format!("{} - {} selected", APP_TITLE, plan(self.catalog, &self.store).total());

        let chosen = match self.dialog.menu(&title, &items)? {
            MenuResult::Chosen(id) => id,
            MenuResult::Cancelled => {
                return if self.dialog.yes_no(APP_TITLE, "Quit without installing?")? {
                    Ok(SessionState::Exited(SessionEnd::Quit))
                } else {
                    Ok(SessionState::Browsing)
                };
            }
        };

        match chosen.as_str() {
            MENU_INSTALL => {
                let plan = plan(self.catalog, &self.store);
                if plan.is_empty() {
                    info!("Install requested with nothing selected");
                    self.dialog
                        .message(APP_TITLE, &ArchPkgError::NoSelection.to_string())?;
                    Ok(SessionState::Browsing)
                } else {
                    Ok(SessionState::Reviewing(plan))
                }
            }
            MENU_CLEAR => {
                self.store.clear_all();
                self.dialog.message(APP_TITLE, "All selections cleared.")?;
                Ok(SessionState::Browsing)
            }
            MENU_QUIT => Ok(SessionState::Exited(SessionEnd::Quit)),
            id => match self.catalog.categories().iter().position(|c| c.id == id) {
                Some(index) => Ok(SessionState::CategoryOpen(index)),
                None => {
                    warn!("Menu returned unknown id '{}'", id);
                    Ok(SessionState::Browsing)
                }
            },
        }
    }

    fn open_category(&mut self, index: usize) -> Result<SessionState> {
        if let Some(category) = self.catalog.categories().get(index) {
            present(&mut *self.dialog, &mut self.store, category, self.settings.preselect)?;
        }
        Ok(SessionState::Browsing)
    }

    fn review(&mut self, plan: InstallPlan) -> Result<SessionState> {
        let text = format!("{}\nProceed with installation?", plan.review_text());
        if self.dialog.yes_no("Confirm installation", &text)? {
            Ok(SessionState::Installing(plan))
        } else {
            debug!("Installation declined at review");
            Ok(SessionState::Browsing)
        }
    }

    fn install(&mut self, plan: &InstallPlan) -> Result<SessionState> {
        info!("Installing {} item(s)", plan.total());
        let report: InstallReport = self.installer.execute(self.runner, plan);
        let summary = report.summary();

        if report.all_succeeded() {
            Ok(SessionState::PostInstallPrompt(summary))
        } else {
            self.dialog.message(
                "Installation incomplete",
                &format!("{}\nYour selections are kept; choose Install to retry.", summary),
            )?;
            Ok(SessionState::Browsing)
        }
    }

    fn post_install(&mut self, summary: &str) -> Result<SessionState> {
        if self.installer.handle().flatpak_newly_installed {
            let text = format!(
                "{}\nFlatpak was installed; a reboot is recommended.\nReboot now? (No returns to the menu)",
                summary
            );
            if !self.dialog.yes_no("Installation complete", &text)? {
                return Ok(SessionState::Browsing);
            }
            let reboot = CommandSpec::new("systemctl").arg("reboot").privileged();
            match self
                .runner
                .run(&reboot)
                .and_then(|status| status.ensure_success(&reboot))
            {
                Ok(()) if self.settings.dry_run => {
                    self.dialog
                        .message(APP_TITLE, "Dry run: reboot skipped.")?;
                    Ok(SessionState::Exited(SessionEnd::Finished))
                }
                Ok(()) => Ok(SessionState::Exited(SessionEnd::Reboot)),
                Err(e) => {
                    self.dialog.message("Reboot failed", &e.to_string())?;
                    Ok(SessionState::Browsing)
                }
            }
        } else {
            let text = format!("{}\nExit now? (No returns to the menu)", summary);
            if self.dialog.yes_no("Installation complete", &text)? {
                Ok(SessionState::Exited(SessionEnd::Finished))
            } else {
                Ok(SessionState::Browsing)
            }
        }
    }
}
