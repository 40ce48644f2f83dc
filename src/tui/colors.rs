//! Color constants for the terminal user interface.

use ratatui::style::Color;

// Tab accents: amber while work is open, green once it is done.

/// Used for the Incomplete tab and the status bar under it.
pub const AMBER: Color = Color::Rgb(255, 179, 0);
/// Used for the Complete tab and the status bar under it.
pub const SEA_GREEN: Color = Color::Rgb(46, 139, 87);
/// Border accent for the modal form.
pub const SLATE_BLUE: Color = Color::Rgb(106, 90, 205);
