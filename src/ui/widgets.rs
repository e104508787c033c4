//! Dialog widget state and key handling
//!
//! Kept free of any terminal I/O so the behaviour can be tested directly.
//! Each `handle_key` returns `Some(answer)` once the dialog is finished.

use crate::dialog::{ChecklistItem, ChecklistResult, MenuItem, MenuResult};
use crossterm::event::{KeyCode, KeyEvent};

fn move_cursor(cursor: usize, len: usize, up: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if up {
        cursor.checked_sub(1).unwrap_or(len - 1)
    } else {
        (cursor + 1) % len
    }
}

/// Multi-select list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistState {
    items: Vec<ChecklistItem>,
    cursor: usize,
}

impl ChecklistState {
    pub fn new(items: &[ChecklistItem]) -> Self {
        Self {
            items: items.to_vec(),
            cursor: 0,
        }
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn toggle(&mut self) {
        if let Some(item) = self.items.get_mut(self.cursor) {
            item.checked = !item.checked;
        }
    }

    pub fn set_all(&mut self, checked: bool) {
        for item in &mut self.items {
            item.checked = checked;
        }
    }

    /// Ids of checked rows in display order
    pub fn checked_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|i| i.checked)
            .map(|i| i.id.clone())
            .collect()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ChecklistResult> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = move_cursor(self.cursor, self.items.len(), true)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = move_cursor(self.cursor, self.items.len(), false)
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.items.len().saturating_sub(1),
            KeyCode::Char(' ') => self.toggle(),
            KeyCode::Char('a') => self.set_all(true),
            KeyCode::Char('n') => self.set_all(false),
            KeyCode::Enter => return Some(ChecklistResult::Confirmed(self.checked_ids())),
            KeyCode::Esc | KeyCode::Char('q') => return Some(ChecklistResult::Cancelled),
            _ => {}
        }
        None
    }
}

/// Single-choice list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    items: Vec<MenuItem>,
    cursor: usize,
}

impl MenuState {
    pub fn new(items: &[MenuItem]) -> Self {
        Self {
            items: items.to_vec(),
            cursor: 0,
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<MenuResult> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = move_cursor(self.cursor, self.items.len(), true)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = move_cursor(self.cursor, self.items.len(), false)
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.items.len().saturating_sub(1),
            KeyCode::Enter => {
                return Some(match self.items.get(self.cursor) {
                    Some(item) => MenuResult::Chosen(item.id.clone()),
                    None => MenuResult::Cancelled,
                });
            }
            KeyCode::Esc | KeyCode::Char('q') => return Some(MenuResult::Cancelled),
            _ => {}
        }
        None
    }
}

/// Yes/No question, defaulting to Yes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YesNoState {
    pub yes: bool,
}

impl Default for YesNoState {
    fn default() -> Self {
        Self { yes: true }
    }
}

impl YesNoState {
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<bool> {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => self.yes = !self.yes,
            KeyCode::Char('y') | KeyCode::Char('Y') => return Some(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return Some(false),
            KeyCode::Enter => return Some(self.yes),
            _ => {}
        }
        None
    }
}

/// Acknowledge-only message
pub fn message_done(key: KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('q')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn items() -> Vec<ChecklistItem> {
        vec![
            ChecklistItem::new("vim", "Vim editor", true),
            ChecklistItem::new("nano", "Nano editor", true),
            ChecklistItem::new("emacs", "Emacs", false),
        ]
    }

    #[test]
    fn test_checklist_toggle_and_confirm() {
        let mut state = ChecklistState::new(&items());
        assert_eq!(state.handle_key(key(KeyCode::Down)), None);
        assert_eq!(state.handle_key(key(KeyCode::Char(' '))), None);
        assert_eq!(
            state.handle_key(key(KeyCode::Enter)),
            Some(ChecklistResult::Confirmed(vec!["vim".to_string()]))
        );
    }

    #[test]
    fn test_checklist_cursor_wraps() {
        let mut state = ChecklistState::new(&items());
        state.handle_key(key(KeyCode::Up));
        assert_eq!(state.cursor(), 2);
        state.handle_key(key(KeyCode::Down));
        assert_eq!(state.cursor(), 0);
        state.handle_key(key(KeyCode::End));
        assert_eq!(state.cursor(), 2);
    }

    #[test]
    fn test_checklist_all_none_and_cancel() {
        let mut state = ChecklistState::new(&items());
        state.handle_key(key(KeyCode::Char('a')));
        assert_eq!(state.checked_ids(), vec!["vim", "nano", "emacs"]);
        state.handle_key(key(KeyCode::Char('n')));
        assert!(state.checked_ids().is_empty());
        assert_eq!(
            state.handle_key(key(KeyCode::Esc)),
            Some(ChecklistResult::Cancelled)
        );
    }

    #[test]
    fn test_empty_checklist() {
        let mut state = ChecklistState::new(&[]);
        state.handle_key(key(KeyCode::Down));
        state.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(
            state.handle_key(key(KeyCode::Enter)),
            Some(ChecklistResult::Confirmed(vec![]))
        );
    }

    #[test]
    fn test_menu_choose() {
        let mut state = MenuState::new(&[
            MenuItem::new("Editors", "Text editors"),
            MenuItem::new("INSTALL", "Install"),
        ]);
        state.handle_key(key(KeyCode::Char('j')));
        assert_eq!(
            state.handle_key(key(KeyCode::Enter)),
            Some(MenuResult::Chosen("INSTALL".to_string()))
        );
        assert_eq!(state.handle_key(key(KeyCode::Esc)), Some(MenuResult::Cancelled));
    }

    #[test]
    fn test_yes_no() {
        let mut state = YesNoState::default();
        assert_eq!(state.handle_key(key(KeyCode::Enter)), Some(true));
        state.handle_key(key(KeyCode::Right));
        assert_eq!(state.handle_key(key(KeyCode::Enter)), Some(false));
        assert_eq!(state.handle_key(key(KeyCode::Char('y'))), Some(true));
        assert_eq!(state.handle_key(key(KeyCode::Esc)), Some(false));
    }

    #[test]
    fn test_message_keys() {
        assert!(message_done(key(KeyCode::Enter)));
        assert!(!message_done(key(KeyCode::Char('x'))));
    }
}
