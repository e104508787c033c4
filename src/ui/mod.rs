//! Terminal dialogs
//!
//! [`TerminalDialog`] implements [`Dialog`] with ratatui on crossterm. The
//! terminal is switched to raw mode and the alternate screen only for the
//! duration of a single dialog, so installer commands that run between
//! dialogs write to the normal screen.
//!
//! - `widgets` - cursor/toggle state and key handling, no I/O

pub mod widgets;

use crate::dialog::{ChecklistItem, ChecklistResult, Dialog, MenuItem, MenuResult};
use crate::error::{ArchPkgError, Result};
use crate::theme::{Styles, UiConstants, UiText};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io::{stdout, Stdout};
use tracing::debug;
use widgets::{message_done, ChecklistState, MenuState, YesNoState};

/// Raw mode + alternate screen for as long as it lives
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()
            .map_err(|e| ArchPkgError::terminal(format!("Failed to enable raw mode: {}", e)))?;
        if let Err(e) = execute!(stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(ArchPkgError::terminal(format!(
                "Failed to enter alternate screen: {}",
                e
            )));
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))
            .map_err(|e| ArchPkgError::terminal(format!("Failed to create terminal: {}", e)))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Always attempt cleanup, even if the dialog failed
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Dialog width for a screen `screen_width` columns wide
fn dialog_width(screen_width: u16) -> u16 {
    let scaled = u32::from(screen_width) * u32::from(UiConstants::DIALOG_WIDTH_PCT) / 100;
    let capped = scaled.min(u32::from(UiConstants::DIALOG_MAX_WIDTH)) as u16;
    capped.min(screen_width)
}

/// Centered dialog area sized for `content_rows` rows
fn dialog_area(screen: Rect, content_rows: u16) -> Rect {
    let width = dialog_width(screen.width);
    let height = content_rows
        .saturating_add(UiConstants::DIALOG_CHROME)
        .min(screen.height);
    Rect::new(
        screen.x + (screen.width - width) / 2,
        screen.y + (screen.height - height) / 2,
        width,
        height,
    )
}

/// Draw the frame shared by all dialogs and return the body area
fn draw_frame(f: &mut Frame, area: Rect, title: &str, hint: &str) -> Rect {
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .title(Span::styled(format!(" {} ", title), Styles::title()))
        .style(Styles::dialog());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);
    f.render_widget(Paragraph::new(hint).style(Styles::nav_hint()), chunks[1]);
    chunks[0]
}

/// Line count of `text` once wrapped to `width` (approximate)
fn wrapped_rows(text: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    text.lines()
        .map(|l| l.chars().count().max(1).div_ceil(width))
        .sum::<usize>()
        .min(u16::MAX as usize) as u16
}

/// Dialog renderer for an interactive terminal
#[derive(Debug, Default)]
pub struct TerminalDialog;

impl TerminalDialog {
    pub fn new() -> Self {
        Self
    }

    /// Draw with `render` and feed keys to `handle` until it returns an answer
    fn run<S, R>(
        &mut self,
        state: &mut S,
        mut render: impl FnMut(&mut Frame, &S),
        mut handle: impl FnMut(&mut S, KeyEvent) -> Option<R>,
    ) -> Result<R> {
        let mut guard = TerminalGuard::enter()?;
        loop {
            guard.terminal.draw(|f| render(f, &*state))?;
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(answer) = handle(state, key) {
                    return Ok(answer);
                }
            }
        }
    }
}

impl Dialog for TerminalDialog {
    fn checklist(&mut self, title: &str, items: &[ChecklistItem]) -> Result<ChecklistResult> {
        debug!("Checklist '{}' with {} items", title, items.len());
        let id_width = items.iter().map(|i| i.id.chars().count()).max().unwrap_or(0);
        let mut state = ChecklistState::new(items);
        self.run(
            &mut state,
            |f, state| {
                let area = dialog_area(f.area(), state.items().len() as u16);
                let body = draw_frame(f, area, title, UiText::HINT_CHECKLIST);
                let rows: Vec<ListItem> = state
                    .items()
                    .iter()
                    .map(|item| {
                        let (mark, style) = if item.checked {
                            ("[x] ", Styles::checked())
                        } else {
                            ("[ ] ", Styles::button_inactive())
                        };
                        ListItem::new(Line::from(vec![
                            Span::styled(mark, style),
                            Span::raw(format!("{:<width$}  ", item.id, width = id_width)),
                            Span::styled(item.label.clone(), Styles::description()),
                        ]))
                    })
                    .collect();
                let mut list_state = ListState::default();
                list_state.select(Some(state.cursor()));
                let list = List::new(rows)
                    .highlight_style(Styles::highlight())
                    .highlight_symbol("> ");
                f.render_stateful_widget(list, body, &mut list_state);
            },
            |state, key| state.handle_key(key),
        )
    }

    fn menu(&mut self, title: &str, items: &[MenuItem]) -> Result<MenuResult> {
        debug!("Menu '{}' with {} items", title, items.len());
        let mut state = MenuState::new(items);
        self.run(
            &mut state,
            |f, state| {
                let area = dialog_area(f.area(), state.items().len() as u16);
                let body = draw_frame(f, area, title, UiText::HINT_MENU);
                let rows: Vec<ListItem> = state
                    .items()
                    .iter()
                    .map(|item| ListItem::new(item.label.clone()))
                    .collect();
                let mut list_state = ListState::default();
                list_state.select(Some(state.cursor()));
                let list = List::new(rows)
                    .highlight_style(Styles::highlight())
                    .highlight_symbol("> ");
                f.render_stateful_widget(list, body, &mut list_state);
            },
            |state, key| state.handle_key(key),
        )
    }

    fn yes_no(&mut self, title: &str, text: &str) -> Result<bool> {
        let mut state = YesNoState::default();
        self.run(
            &mut state,
            |f, state| {
                let screen = f.area();
                let width = dialog_width(screen.width);
                let rows = wrapped_rows(text, width.saturating_sub(2)).saturating_add(2);
                let area = dialog_area(screen, rows);
                let body = draw_frame(f, area, title, UiText::HINT_YES_NO);

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(1), Constraint::Length(1)])
                    .split(body);
                f.render_widget(
                    Paragraph::new(text).wrap(Wrap { trim: false }),
                    chunks[0],
                );
                let (yes, no) = if state.yes {
                    (Styles::button_active(), Styles::button_inactive())
                } else {
                    (Styles::button_inactive(), Styles::button_active())
                };
                let buttons = Line::from(vec![
                    Span::styled(UiText::BTN_YES, yes),
                    Span::raw("   "),
                    Span::styled(UiText::BTN_NO, no),
                ])
                .centered();
                f.render_widget(Paragraph::new(buttons), chunks[1]);
            },
            |state, key| state.handle_key(key),
        )
    }

    fn message(&mut self, title: &str, text: &str) -> Result<()> {
        self.run(
            &mut (),
            |f, _| {
                let screen = f.area();
                let width = dialog_width(screen.width);
                let area = dialog_area(screen, wrapped_rows(text, width.saturating_sub(2)));
                let body = draw_frame(f, area, title, UiText::HINT_MESSAGE);
                f.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), body);
            },
            |_, key| message_done(key).then_some(()),
        )
    }
}
