//! CSV export of weight records.
//!
//! Output is spreadsheet-safe: cells that a spreadsheet would evaluate as a
//! formula (leading `=`, `+`, `-` or `@`) are prefixed with `'`, and cells
//! containing a comma, quote or newline are quoted with inner quotes doubled.

use crate::models::WeightRecord;

/// Header row, in column order.
pub const CSV_HEADER: [&str; 3] = ["date", "weight", "body_fat"];

/// File name offered for downloads.
pub const EXPORT_FILENAME: &str = "morning-light-weights.csv";

/// MIME type for the export.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

const FORMULA_PREFIXES: [char; 4] = ['=', '+', '-', '@'];

/// Escape a single cell value.
pub fn escape_csv_value(value: &str) -> String {
    let safe = if value.starts_with(FORMULA_PREFIXES) {
        format!("'{value}")
    } else {
        value.to_string()
    };

    if safe.contains(['"', ',', '\n']) {
        format!("\"{}\"", safe.replace('"', "\"\""))
    } else {
        safe
    }
}

/// Serialize records in the given order. Lines are joined with `\n`, no trailing newline.
pub fn weights_to_csv(records: &[WeightRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.join(","));

    for record in records {
        let body_fat = record.body_fat.map(|v| v.to_string()).unwrap_or_default();
        let row = [
            escape_csv_value(&record.date),
            escape_csv_value(&record.weight.to_string()),
            escape_csv_value(&body_fat),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Serialize records oldest-first, the order used for file downloads.
pub fn export_csv(records: &[WeightRecord]) -> String {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));
    weights_to_csv(&sorted)
}
