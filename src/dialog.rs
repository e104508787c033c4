//! UI collaborator contract
//!
//! The session never draws anything itself. It hands plain item lists to a
//! [`Dialog`] and gets plain choices back, so the terminal implementation in
//! [`crate::ui`] can be swapped for a scripted one in tests.

use crate::error::Result;

/// One row of a checklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
    pub checked: bool,
}

impl ChecklistItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>, checked: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            checked,
        }
    }
}

/// One row of a menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Result of a checklist render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecklistResult {
    /// User confirmed; ids of the checked rows in display order
    Confirmed(Vec<String>),
    /// User backed out
    Cancelled,
}

/// Result of a menu render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuResult {
    Chosen(String),
    Cancelled,
}

/// Blocking dialog renderer.
///
/// Every call returns only once the user has answered.
pub trait Dialog {
    /// Multi-select list of `items`
    fn checklist(&mut self, title: &str, items: &[ChecklistItem]) -> Result<ChecklistResult>;

    /// Single choice from `items`
    fn menu(&mut self, title: &str, items: &[MenuItem]) -> Result<MenuResult>;

    /// Yes/No question; cancelling counts as No
    fn yes_no(&mut self, title: &str, text: &str) -> Result<bool>;

    /// Informational message acknowledged by the user
    fn message(&mut self, title: &str, text: &str) -> Result<()>;
}
