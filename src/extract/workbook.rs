//! Spreadsheet workbook summarization via calamine.
//!
//! Workbooks are opened from the in-memory payload (Xlsx reader for
//! .xlsx/.xlsm, Xls reader for .xls), converted sheet by sheet into row-major
//! string grids, and summarized by a pure formatting pass.

use std::io::Cursor;

use calamine::{Reader, Xls, Xlsx};

use crate::error::AnalyzerError;
use crate::source::SourceFile;

type Grid = Vec<Vec<String>>;

pub(crate) fn summarize(
    source: &SourceFile,
    max_sheets: usize,
    sample_rows: usize,
) -> Result<String, AnalyzerError> {
    let cursor = Cursor::new(source.bytes());
    let is_legacy = source.name().to_ascii_lowercase().ends_with(".xls");

    let sheets = if is_legacy {
        let mut workbook: Xls<_> = Xls::new(cursor).map_err(|e| AnalyzerError::Workbook {
            message: e.to_string(),
        })?;
        collect_grids(&mut workbook)
    } else {
        let mut workbook: Xlsx<_> = Xlsx::new(cursor).map_err(|e| AnalyzerError::Workbook {
            message: e.to_string(),
        })?;
        collect_grids(&mut workbook)
    };

    tracing::debug!(
        "[Extractor] {}: workbook with {} sheet(s)",
        source.name(),
        sheets.len()
    );

    Ok(summarize_grids(&sheets, max_sheets, sample_rows))
}

/// Convert every sheet to a row-major grid of rendered cell values.
fn collect_grids<RS, R>(workbook: &mut R) -> Vec<(String, Grid)>
where
    RS: std::io::Read + std::io::Seek,
    R: Reader<RS>,
{
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    sheet_names
        .into_iter()
        .map(|name| {
            let grid = workbook
                .worksheet_range(&name)
                .map(|range| {
                    range
                        .rows()
                        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                        .collect()
                })
                .unwrap_or_default();
            (name, grid)
        })
        .collect()
}

/// Format the sheet grids: dimensions, header row, and a few sample rows per
/// sheet, detailing at most `max_sheets` sheets.
fn summarize_grids(sheets: &[(String, Grid)], max_sheets: usize, sample_rows: usize) -> String {
    let sheet_names: Vec<&str> = sheets.iter().map(|(name, _)| name.as_str()).collect();
    let mut summary = format!(
        "Workbook contains {} sheet(s): {}\n\n",
        sheets.len(),
        sheet_names.join(", ")
    );

    let detailed = max_sheets.min(sheets.len());
    for (name, grid) in &sheets[..detailed] {
        if grid.is_empty() {
            summary.push_str(&format!("Sheet \"{}\" appears to be empty.\n\n", name));
            continue;
        }

        let row_count = grid.len();
        let col_count = grid[0].len();
        summary.push_str(&format!(
            "Sheet \"{}\": {} rows x {} columns\n",
            name, row_count, col_count
        ));

        let headers = &grid[0];
        summary.push_str(&format!("Headers: {}\n", headers.join(", ")));

        let samples = sample_rows.min(row_count - 1);
        if samples > 0 {
            summary.push_str("Sample data:\n");
            for (offset, row) in grid[1..=samples].iter().enumerate() {
                let rendered = row
                    .iter()
                    .enumerate()
                    .map(|(idx, cell)| match headers.get(idx).filter(|h| !h.is_empty()) {
                        Some(header) => format!("{}: {}", header, cell),
                        None => format!("Column {}: {}", idx + 1, cell),
                    })
                    .collect::<Vec<_>>()
                    .join(" | ");
                summary.push_str(&format!("Row {}: {}\n", offset + 1, rendered));
            }
        }

        summary.push('\n');
    }

    if sheets.len() > detailed {
        summary.push_str(&format!(
            "Note: Only showing details for the first {} sheets.\n",
            detailed
        ));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_single_sheet_summary() {
        let sheets = vec![(
            "Orders".to_string(),
            grid(&[
                &["id", "total"],
                &["1", "9.99"],
                &["2", "15.00"],
                &["3", "7.50"],
                &["4", "1.25"],
            ]),
        )];
        let summary = summarize_grids(&sheets, 3, 3);

        assert!(summary.contains("Workbook contains 1 sheet(s): Orders"));
        assert!(summary.contains("Sheet \"Orders\": 5 rows x 2 columns"));
        assert!(summary.contains("Headers: id, total"));
        assert!(summary.contains("Row 1: id: 1 | total: 9.99"));
        assert!(summary.contains("Row 3: id: 3 | total: 7.50"));
        assert!(!summary.contains("Row 4:"));
        assert!(!summary.contains("Note: Only showing"));
    }

    #[test]
    fn test_four_sheets_detail_three_and_note_the_rest() {
        let sheets: Vec<(String, Grid)> = (1..=4)
            .map(|i| {
                (
                    format!("Sheet{}", i),
                    grid(&[&["col"], &["value"]]),
                )
            })
            .collect();
        let summary = summarize_grids(&sheets, 3, 3);

        assert!(summary.contains("Workbook contains 4 sheet(s): Sheet1, Sheet2, Sheet3, Sheet4"));
        assert!(summary.contains("Sheet \"Sheet1\":"));
        assert!(summary.contains("Sheet \"Sheet3\":"));
        assert!(!summary.contains("Sheet \"Sheet4\":"));
        assert!(summary.contains("Note: Only showing details for the first 3 sheets."));
    }

    #[test]
    fn test_empty_sheet_noted() {
        let sheets = vec![("Blank".to_string(), Grid::new())];
        let summary = summarize_grids(&sheets, 3, 3);

        assert!(summary.contains("Sheet \"Blank\" appears to be empty."));
    }

    #[test]
    fn test_header_fallback_to_positional_label() {
        let sheets = vec![(
            "Wide".to_string(),
            grid(&[&["name", ""], &["a", "b", "c"]]),
        )];
        let summary = summarize_grids(&sheets, 3, 3);

        assert!(summary.contains("Row 1: name: a | Column 2: b | Column 3: c"));
    }

    #[test]
    fn test_header_only_sheet_has_no_sample_block() {
        let sheets = vec![("Head".to_string(), grid(&[&["a", "b"]]))];
        let summary = summarize_grids(&sheets, 3, 3);

        assert!(summary.contains("Sheet \"Head\": 1 rows x 2 columns"));
        assert!(summary.contains("Headers: a, b"));
        assert!(!summary.contains("Sample data:"));
    }

    #[test]
    fn test_garbage_payload_is_workbook_error() {
        let source = SourceFile::from_bytes("broken.xlsx", b"not a zip archive".to_vec());
        let err = summarize(&source, 3, 3).unwrap_err();
        assert!(matches!(err, AnalyzerError::Workbook { .. }));
    }
}
