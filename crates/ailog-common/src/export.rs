//! CSV rendering of log listings.
//!
//! Shared between the server's export endpoint and the client's local
//! fallback so both produce byte-identical documents.

use crate::entry::LogEntry;

pub const CSV_HEADER: &str =
    "ID,Timestamp,Provider,Model,Feature,Prompt,Output,Duration(ms),Success";

/// UTF-8 byte-order mark. Spreadsheet tools key their encoding detection on
/// it, so exported CSV must start with one.
pub const UTF8_BOM: &str = "\u{feff}";

/// Quote a field when it contains a delimiter, quote, or line break;
/// internal quotes are doubled.
fn csv_field(value: &str) -> String {
    if value.contains(&['"', ',', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(entry: &LogEntry) -> String {
    let output = entry
        .output
        .response
        .as_deref()
        .or(entry.output.error.as_deref())
        .unwrap_or("");
    [
        csv_field(&entry.id),
        csv_field(&entry.timestamp),
        csv_field(&entry.provider),
        csv_field(&entry.model),
        csv_field(&entry.feature),
        csv_field(&entry.input.prompt),
        csv_field(output),
        entry.duration.to_string(),
        entry.success.to_string(),
    ]
    .join(",")
}

/// Render a header row plus one row per entry.
pub fn csv_export(entries: &[LogEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(entries.iter().map(csv_row));
    lines.join("\n")
}

/// BOM-prefixed variant for download endpoints.
pub fn csv_export_with_bom(entries: &[LogEntry]) -> String {
    format!("{UTF8_BOM}{}", csv_export(entries))
}
