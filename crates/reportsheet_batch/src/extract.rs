//! Table extraction: rendered table -> report record.

use crate::conf::C_HEADER_OVERALL_RESULT;
use crate::spec::{ExtractError, SpecRenderedTable, SpecReportRecord};

/// Build the record of one report.
///
/// Rows without cells (typically the `th` header row) are skipped. The last
/// remaining row is the verdict row: it is dropped from the data and its
/// first cell becomes the verdict, which is appended to the first data row
/// only. Headers are taken when `if_capture_headers` is set and get the
/// `Overall Result` column.
pub fn extract_report(
    table: Option<&SpecRenderedTable>,
    if_capture_headers: bool,
) -> Result<SpecReportRecord, ExtractError> {
    let table = table.ok_or(ExtractError::MissingTable)?;

    let headers = if_capture_headers.then(|| {
        let mut l_headers = table.header_cells.clone();
        l_headers.push(C_HEADER_OVERALL_RESULT.to_string());
        l_headers
    });

    let mut data_rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .filter(|row| !row.is_empty())
        .cloned()
        .collect();

    let row_verdict = data_rows.pop().ok_or_else(|| {
        ExtractError::MalformedReport("table has no data or verdict rows".to_string())
    })?;
    let verdict = row_verdict.into_iter().next().unwrap_or_default();

    let Some(row_first) = data_rows.first_mut() else {
        return Err(ExtractError::MalformedReport(
            "table has a verdict row but no data rows".to_string(),
        ));
    };
    row_first.push(verdict.clone());

    Ok(SpecReportRecord {
        headers,
        data_rows,
        verdict,
    })
}
