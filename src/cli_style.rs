/*!
 * mdpack CLI Style System
 *
 * Themed text, status tables and the wait spinner.
 */

use std::time::Duration;

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};

use crate::package::RequestStatus;

// ============================================================================
// THEME COLORS
// ============================================================================

/// Brand colors for consistent styling
pub struct Theme;

impl Theme {
    pub fn warning<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).yellow()
    }

    pub fn error<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).red()
    }

    /// Muted/secondary text (dim)
    pub fn muted<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).dim()
    }
}

// ============================================================================
// ICONS
// ============================================================================

/// Unicode icons for visual feedback
pub struct Icons;

impl Icons {
    pub const SUCCESS: &'static str = "✓";
    pub const ERROR: &'static str = "✗";
    pub const WARNING: &'static str = "⚠";
    pub const PENDING: &'static str = "○";
    pub const RUNNING: &'static str = "◐";
    pub const ARROW_RIGHT: &'static str = "→";
}

// ============================================================================
// TABLES
// ============================================================================

/// Create a styled data table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Create a minimal table (no outer borders)
pub fn create_minimal_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_NO_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Data table with a bold cyan header row
pub fn record_table(headers: &[&str]) -> Table {
    let mut table = create_table();
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

/// Key-value table for single records
pub fn key_value_table(items: &[(&str, String)]) -> Table {
    let mut table = create_minimal_table();

    for (key, value) in items {
        table.add_row(vec![
            Cell::new(key).fg(Color::Cyan),
            Cell::new(value).add_attribute(Attribute::Bold),
        ]);
    }

    table
}

/// Status cell colored by lifecycle position
pub fn status_cell(status: RequestStatus) -> Cell {
    let (icon, color) = match status {
        RequestStatus::Queued => (Icons::PENDING, Color::DarkGrey),
        RequestStatus::InProgress => (Icons::RUNNING, Color::Yellow),
        RequestStatus::Success => (Icons::SUCCESS, Color::Green),
        RequestStatus::Error => (Icons::ERROR, Color::Red),
    };
    Cell::new(format!("{} {}", icon, status)).fg(color)
}

/// Render an optional field, blank when absent
pub fn optional(value: Option<&str>) -> String {
    value.unwrap_or("").to_string()
}

// ============================================================================
// SPINNER
// ============================================================================

/// Spinner shown while waiting on a remote request
pub fn wait_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

// ============================================================================
// MESSAGES
// ============================================================================

/// Print a styled error message with optional suggestion
pub fn print_error(message: &str, suggestion: Option<&str>) {
    eprintln!(
        "{} {}",
        Theme::error(format!("{} Error:", Icons::ERROR)),
        message
    );

    if let Some(hint) = suggestion {
        eprintln!(
            "  {} {}",
            Theme::muted(Icons::ARROW_RIGHT),
            Theme::muted(hint)
        );
    }
}

/// Print a styled warning message
pub fn print_warning(message: &str) {
    eprintln!(
        "{} {}",
        Theme::warning(Icons::WARNING.to_string()),
        Theme::warning(message)
    );
}
