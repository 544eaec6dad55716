//! Stateless helper utilities used by the sheet store.

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL};
use crate::spec::{SpecAutofitPolicy, SpecSheetCell};

////////////////////////////////////////////////////////////////////////////////
// #region AppendOffset

/// Whether the sheet holds no real content yet.
///
/// A sheet is logically empty when it has no rows, or exactly one row whose
/// first cell is blank. This is the state of a freshly created workbook.
pub fn is_sheet_logically_empty(rows: &[Vec<SpecSheetCell>]) -> bool {
    match rows {
        [] => true,
        [row] => row.first().is_none_or(|cell| cell.value.is_empty()),
        _ => false,
    }
}

/// Zero-based row index where the next append starts.
///
/// A logically empty sheet is overwritten in place from row 0; otherwise
/// rows go right after the last used row.
pub fn plan_insert_row(rows: &[Vec<SpecSheetCell>]) -> usize {
    if is_sheet_logically_empty(rows) {
        0
    } else {
        rows.len()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Autofit

/// Measured length of a stringified cell value (character count).
pub fn calculate_display_len(cell: &SpecSheetCell) -> usize {
    cell.value.to_display_string().chars().count()
}

/// Uncapped width/height for a measured length at the given font size.
pub fn calculate_autofit_extent(n_len: usize, n_font_size: i64, policy: &SpecAutofitPolicy) -> f64 {
    n_len as f64 * n_font_size as f64 / policy.font_size_ref + policy.padding
}

/// Column widths derived from the longest value in each column.
///
/// Columns whose cells are all blank get `None` (Excel default width).
pub fn derive_column_widths(
    rows: &[Vec<SpecSheetCell>],
    n_font_size: i64,
    policy: &SpecAutofitPolicy,
) -> Vec<Option<f64>> {
    let n_width_sheet = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut l_len_max_by_col = vec![0usize; n_width_sheet];
    for row in rows {
        for (n_idx_col, cell) in row.iter().enumerate() {
            l_len_max_by_col[n_idx_col] =
                usize::max(l_len_max_by_col[n_idx_col], calculate_display_len(cell));
        }
    }

    l_len_max_by_col
        .into_iter()
        .map(|n_len| {
            (n_len > 0).then(|| {
                f64::min(
                    calculate_autofit_extent(n_len, n_font_size, policy),
                    policy.width_max,
                )
            })
        })
        .collect()
}

/// Row heights derived from the longest value in each row.
///
/// Rows whose cells are all blank get `None` (Excel default height).
pub fn derive_row_heights(
    rows: &[Vec<SpecSheetCell>],
    n_font_size: i64,
    policy: &SpecAutofitPolicy,
) -> Vec<Option<f64>> {
    rows.iter()
        .map(|row| {
            let n_len = row.iter().map(calculate_display_len).max().unwrap_or(0);
            (n_len > 0).then(|| {
                f64::min(
                    calculate_autofit_extent(n_len, n_font_size, policy),
                    policy.height_max,
                )
            })
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Convert a zero-based row index into the writer's row type.
pub(crate) fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

/// Convert a zero-based column index into the writer's column type.
pub(crate) fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::EnumCellValue;

    fn derive_row(values: &[&str]) -> Vec<SpecSheetCell> {
        values
            .iter()
            .map(|value| SpecSheetCell {
                value: EnumCellValue::from(*value),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_fresh_sheet_is_overwritten_in_place() {
        assert_eq!(plan_insert_row(&[]), 0);
        assert_eq!(plan_insert_row(&[vec![]]), 0);
        assert_eq!(plan_insert_row(&[derive_row(&["", "B"])]), 0);
    }

    #[test]
    fn test_sheet_with_content_appends_after_last_row() {
        assert_eq!(plan_insert_row(&[derive_row(&["Name"])]), 1);
        assert_eq!(plan_insert_row(&[derive_row(&[""]), derive_row(&[""])]), 2);
        assert!(!is_sheet_logically_empty(&[
            derive_row(&["A"]),
            derive_row(&["B"]),
        ]));
    }

    #[test]
    fn test_column_widths_use_whole_sheet_and_font_size() {
        let rows = vec![
            derive_row(&["Name", "Status"]),
            derive_row(&["a-much-longer-name", "OK", ""]),
        ];
        let policy = SpecAutofitPolicy::default();

        let l_widths = derive_column_widths(&rows, 12, &policy);
        assert_eq!(l_widths, vec![Some(20.0), Some(8.0), None]);

        let l_widths = derive_column_widths(&rows, 24, &policy);
        assert_eq!(l_widths[0], Some(38.0));
    }

    #[test]
    fn test_row_heights_follow_longest_cell_and_are_capped() {
        let c_long = "x".repeat(1_000);
        let rows = vec![
            derive_row(&["abcd", "ab"]),
            derive_row(&[""]),
            derive_row(&[c_long.as_str()]),
        ];
        let policy = SpecAutofitPolicy::default();

        let l_heights = derive_row_heights(&rows, 12, &policy);
        assert_eq!(l_heights[0], Some(6.0));
        assert_eq!(l_heights[1], None);
        assert_eq!(l_heights[2], Some(policy.height_max));
    }

    #[test]
    fn test_display_len_counts_chars_not_bytes() {
        let cell = SpecSheetCell {
            value: EnumCellValue::from("Größe"),
            ..Default::default()
        };
        assert_eq!(calculate_display_len(&cell), 5);
    }

    #[test]
    fn test_sanitize_sheet_name() {
        assert_eq!(sanitize_sheet_name("a/b:c", "_"), "a_b_c");
        assert_eq!(sanitize_sheet_name("   ", "_"), "Sheet");
        assert_eq!(sanitize_sheet_name(&"n".repeat(40), "_").len(), 31);
    }
}
