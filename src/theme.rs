//! Centralized theme and styling for the dialogs
//!
//! Single source of truth for the colors and styles the dialog widgets use.

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette for the application
pub struct Colors;

impl Colors {
    /// Dialog background
    pub const BG_PRIMARY: Color = Color::Rgb(20, 20, 30);

    /// Default foreground text color
    pub const FG_PRIMARY: Color = Color::White;

    /// Secondary/muted text color
    pub const FG_SECONDARY: Color = Color::Gray;

    /// Primary accent color - used for borders, titles
    pub const PRIMARY: Color = Color::Cyan;

    /// Checked checklist marker
    pub const SUCCESS: Color = Color::Green;

    /// Selected row highlight
    pub const SELECTED_BG: Color = Color::Yellow;

    /// Selected row text (for contrast on yellow bg)
    pub const SELECTED_FG: Color = Color::Black;

    /// Navigation hint color
    pub const NAV_HINT: Color = Color::DarkGray;
}

// =============================================================================
// PRE-BUILT STYLES
// =============================================================================

/// Pre-built styles for common UI patterns
pub struct Styles;

impl Styles {
    pub fn dialog() -> Style {
        Style::default().bg(Colors::BG_PRIMARY).fg(Colors::FG_PRIMARY)
    }

    pub fn border() -> Style {
        Style::default().fg(Colors::PRIMARY)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Highlighted row in lists
    pub fn highlight() -> Style {
        Style::default()
            .bg(Colors::SELECTED_BG)
            .fg(Colors::SELECTED_FG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn checked() -> Style {
        Style::default().fg(Colors::SUCCESS)
    }

    pub fn description() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::NAV_HINT)
    }

    pub fn button_active() -> Style {
        Self::highlight()
    }

    pub fn button_inactive() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }
}

// =============================================================================
// LAYOUT CONSTANTS
// =============================================================================

/// Dialog sizing
pub struct UiConstants;

impl UiConstants {
    /// Dialog width as a percentage of the screen
    pub const DIALOG_WIDTH_PCT: u16 = 70;

    /// Maximum dialog width in columns
    pub const DIALOG_MAX_WIDTH: u16 = 90;

    /// Rows reserved for borders and the hint line
    pub const DIALOG_CHROME: u16 = 4;
}

/// Fixed texts shown in dialogs
pub struct UiText;

impl UiText {
    pub const HINT_CHECKLIST: &'static str =
        "↑/↓ move  Space toggle  a all  n none  Enter confirm  Esc cancel";
    pub const HINT_MENU: &'static str = "↑/↓ move  Enter select  Esc back";
    pub const HINT_YES_NO: &'static str = "←/→ choose  y/n  Enter confirm  Esc no";
    pub const HINT_MESSAGE: &'static str = "Press Enter to continue";
    pub const BTN_YES: &'static str = "[ Yes ]";
    pub const BTN_NO: &'static str = "[ No ]";
}
