//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Status;

/// Focused field and selected card border
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Confirmation dialogs and field errors
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
pub const ERROR_RED: Color = Color::Rgb(220, 60, 60);
/// Navigation bar and status bar background
pub const NAVY: Color = Color::Rgb(20, 40, 90);
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

/// Accent for a status column.
pub fn status_color(status: Status) -> Color {
    match status {
        Status::Todo => Color::Blue,
        Status::InProgress => GOLD,
        Status::NeedTest => DARK_PURPLE,
        Status::Completed => DARK_GREEN,
        Status::Reopen => DARK_RED,
    }
}

/// Readable foreground on top of `bg`.
pub fn text_on(bg: Color) -> Color {
    match bg {
        GOLD => Color::Rgb(20, 20, 20),
        _ => Color::White,
    }
}
