//! Terminal rendering of search results
//!
//! Results are printed grouped by entity type: a heading per non-empty
//! group, then one line per item with its identifier and tags.

use owo_colors::OwoColorize;
use std::io::{self, IsTerminal};

use crate::models::{FieldValue, SearchableItem};
use crate::results::GroupedResults;

/// Renders result groups as text
pub struct OutputFormatter {
    use_colors: bool,
}

impl OutputFormatter {
    pub fn new(plain: bool) -> Self {
        // Respect NO_COLOR and skip colors when piped
        let no_color = std::env::var_os("NO_COLOR").is_some();
        let use_colors = !plain && !no_color && io::stdout().is_terminal();
        Self { use_colors }
    }

    /// Render grouped results. Empty groups are skipped.
    pub fn render(&self, grouped: &GroupedResults<'_>) -> String {
        let mut out = String::new();

        for (group, items) in grouped.iter().filter(|(_, items)| !items.is_empty()) {
            let heading = format!("{} ({})", group, items.len());
            if self.use_colors {
                out.push_str(&format!("{}\n", heading.bold().cyan()));
            } else {
                out.push_str(&format!("{}\n", heading));
            }

            for item in items {
                out.push_str(&format!("  {}\n", self.render_item(item)));
            }
            out.push('\n');
        }

        out
    }

    fn render_item(&self, item: &SearchableItem) -> String {
        let id = format!("[{}]", item.value);
        let mut line = if self.use_colors {
            format!("{} {}", item.label.green(), id.dimmed())
        } else {
            format!("{} {}", item.label, id)
        };

        if let Some(FieldValue::List(tags)) = item.data.get("tags") {
            if !tags.is_empty() {
                line.push_str(&format!("  tags: {}", tags.join(", ")));
            }
        }

        line
    }
}
