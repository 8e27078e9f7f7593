//! Delimited-table summarization.
//!
//! Parses the payload with the first row as header and emits counts, the
//! header list, and a handful of sample rows from each end rather than the
//! whole table. Tab-separated files are parsed with a tab delimiter.

use csv::{ReaderBuilder, StringRecord};

use crate::error::AnalyzerError;
use crate::source::SourceFile;

/// Fixed message for tables with no data rows.
pub(crate) const EMPTY_TABLE_MESSAGE: &str = "CSV file appears to be empty.";

pub(crate) fn summarize(source: &SourceFile, sample_rows: usize) -> Result<String, AnalyzerError> {
    let delimiter = if source.name().to_ascii_lowercase().ends_with(".tsv") {
        b'\t'
    } else {
        b','
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(source.bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows: Vec<StringRecord> = Vec::new();
    for record in reader.records() {
        rows.push(record?);
    }

    if rows.is_empty() {
        return Ok(EMPTY_TABLE_MESSAGE.to_string());
    }

    let row_count = rows.len();
    let column_count = columns.len();
    // 1-2 row tables sample nothing; counts and headers still go out.
    let sample_size = sample_rows.min(row_count / 2);

    tracing::debug!(
        "[Extractor] {}: {} rows x {} columns, sampling {} per end",
        source.name(),
        row_count,
        column_count,
        sample_size
    );

    let mut summary = format!(
        "CSV file contains {} rows and {} columns.\n\n",
        row_count, column_count
    );
    summary.push_str(&format!("Columns: {}\n\n", columns.join(", ")));

    summary.push_str("Sample data (first few rows):\n");
    for (i, record) in rows.iter().take(sample_size).enumerate() {
        summary.push_str(&format!("Row {}: {}\n", i + 1, render_row(&columns, record)));
    }

    if sample_size > 0 && row_count > sample_size * 2 {
        summary.push_str("\nSample data (last few rows):\n");
        for (i, record) in rows[row_count - sample_size..].iter().enumerate() {
            let position = row_count - sample_size + i + 1;
            summary.push_str(&format!("Row {}: {}\n", position, render_row(&columns, record)));
        }
    }

    Ok(summary)
}

/// Render one record as `column: value` pairs joined by ` | `.
fn render_row(columns: &[String], record: &StringRecord) -> String {
    columns
        .iter()
        .enumerate()
        .map(|(idx, col)| format!("{}: {}", col, record.get(idx).unwrap_or("")))
        .collect::<Vec<_>>()
        .join(" | ")
}
