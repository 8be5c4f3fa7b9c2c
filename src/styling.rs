//! Semantic style constants for terminal output.
//!
//! This module uses the anstyle ecosystem:
//! - anstream for auto-detecting color support
//! - anstyle for composable styling
//!
//! The session core never writes escape codes itself; it emits tagged
//! spans (see [`crate::render`]) and the renderer maps each tag to one of
//! the constants here. All session output goes to stdout; child process
//! output is forwarded there too, since it is the payload the user asked
//! for.

use anstyle::{AnsiColor, Color, Style};

// Re-exports from anstream (auto-detecting output)
pub use anstream::{print, println, stdout};

/// Screen header and its underline.
pub const HEADER: Style = AnsiColor::Cyan.on_default().bold();

/// The branch currently checked out.
pub const CURRENT_BRANCH: Style = AnsiColor::Green.on_default();

/// The ` (R)` marker after remote-tracking branches.
pub const REMOTE_MARKER: Style = AnsiColor::Magenta.on_default();

/// Key legend shown above the prompt.
pub const HINT: Style = AnsiColor::Cyan.on_default().dimmed();

/// The `> ` input prompt.
pub const PROMPT: Style = AnsiColor::Cyan.on_default();

/// Recoverable error labels.
pub const ERROR: Style = AnsiColor::Red.on_default();

const GUTTER: Style = Style::new().bg_color(Some(Color::Ansi(AnsiColor::Black)));

/// Indent captured subprocess output behind a gutter column.
///
/// Each line gets a black-background gutter cell and two spaces of indent,
/// visually separating git's own words from ours.
pub fn format_with_gutter(text: &str) -> String {
    text.lines()
        .map(|line| format!("{GUTTER} {GUTTER:#}  {line}\n"))
        .collect()
}
