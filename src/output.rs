//! User-facing terminal messages
//!
//! Plain stderr messages for people, kept apart from `log` output so
//! they carry no timestamps or module paths.

use owo_colors::OwoColorize;

/// Display a warning message in yellow with padding
///
/// # Example
/// ```ignore
/// output::warn("Query matched no items.");
/// ```
pub fn warn(message: &str) {
    eprintln!("\n{}\n", message.yellow());
}

/// Display an error message in red with padding
///
/// # Example
/// ```ignore
/// output::error("Failed to read items file.");
/// ```
pub fn error(message: &str) {
    eprintln!("\n{}\n", message.red());
}
