//! Plain-text table rendering for query results.

use crate::entity::FieldValue;

/// Render headers and rows as left-justified fixed-width columns.
///
/// Each column is as wide as its longest header or cell. Columns are joined
/// by `" | "`, the separator line by `"-+-"`. NULL cells render empty. The
/// result has no trailing newline.
pub fn format_table<H: AsRef<str>>(headers: &[H], rows: &[Vec<FieldValue>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            cells
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.chars().count())
                .fold(header.as_ref().chars().count(), usize::max)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(join_padded(headers.iter().map(|h| h.as_ref()), &widths));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &cells {
        lines.push(join_padded(row.iter().map(String::as_str), &widths));
    }

    lines.join("\n")
}

fn cell_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn join_padded<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
}
