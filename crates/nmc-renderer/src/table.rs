//! Inline Markdown table for table-mode databases.

use crate::entry::DatabaseTableEntry;

/// Render entries as a GitHub-flavored Markdown table, one row per entry
/// in entry order.
///
/// Columns follow the key mapping of the first entry. A table without
/// columns, e.g. because `properties.include` is empty, renders as an
/// empty string regardless of the number of entries.
#[must_use]
pub fn render_table(entries: &[DatabaseTableEntry]) -> String {
    let Some(first) = entries.first() else {
        return String::new();
    };
    let columns = &first.properties.keys;
    if columns.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(entries.len() + 2);
    lines.push(row(columns.iter().map(|(name, _)| escape_cell(name))));
    lines.push(row(columns.iter().map(|_| "---".to_owned())));

    for entry in entries {
        let values = &entry.properties.values;
        lines.push(row(columns.iter().map(|(_, slug)| {
            values
                .get(slug)
                .map(|value| escape_cell(&value.to_string()))
                .unwrap_or_default()
        })));
    }

    lines.join("\n")
}

fn row(cells: impl Iterator<Item = String>) -> String {
    let cells: Vec<String> = cells.collect();
    format!("| {} |", cells.join(" | "))
}

/// Keep a value on one line and inside its cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}
