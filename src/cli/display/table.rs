//! Table builder wrapper around comfy-table for consistent list display.

use colored::Colorize;
use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};

/// Create a standard list table with the given headers.
///
/// Uses the NOTHING preset (no borders) for a clean CLI aesthetic.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

/// Render the table to string with a count header.
pub fn render_list(entity_name: &str, table: &Table, total: usize) -> String {
    if total == 0 {
        return format!("No {entity_name}s found.");
    }
    let count_line = format!(
        "{} {}:",
        total.to_string().bold(),
        if total == 1 {
            entity_name.to_string()
        } else {
            format!("{entity_name}s")
        }
    );
    format!("{count_line}\n{table}")
}

/// Bold section heading.
pub fn section(title: &str) -> String {
    format!("\n{}", title.bold().underline())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_list_counts() {
        colored::control::set_override(false);
        let mut table = list_table(&["id", "score"]);
        table.add_row(vec!["arm_0", "0.95"]);
        let rendered = render_list("arm", &table, 1);
        assert!(rendered.starts_with("1 arm:"));
        assert!(rendered.contains("arm_0"));
        assert!(rendered.contains("ID"));
        assert_eq!(render_list("trial", &list_table(&["x"]), 0), "No trials found.");
    }
}
