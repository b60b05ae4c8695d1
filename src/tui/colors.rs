//! Color constants for the terminal user interface.

use ratatui::style::Color;

// One accent per board column, plus a highlight
// for the current project and selected card.

/// Used for the To-Do column
pub const SLATE: Color = Color::Rgb(70, 90, 120);
/// Used for the Doing column
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for the Done column
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Used for the project panel and selection highlight
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);
