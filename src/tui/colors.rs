//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::dialog::flow::Intent;

/// Assistant message header
pub const ASSISTANT: Color = Color::Rgb(120, 190, 255);
/// User message header
pub const USER: Color = Color::Rgb(130, 220, 130);
/// Focused quick-action button
pub const BUTTON_FOCUS: Color = Color::Rgb(255, 215, 0);
/// Muted text such as timestamps
pub const MUTED: Color = Color::DarkGray;

/// Used for adds
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Used for deletes
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Used for updates
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

/// Status bar background for the dialog in progress.
pub fn intent_color(intent: Intent) -> Color {
    match intent {
        Intent::Idle | Intent::View => Color::Blue,
        Intent::Add => DARK_GREEN,
        Intent::Update => DARK_PURPLE,
        Intent::Delete => DARK_RED,
    }
}
