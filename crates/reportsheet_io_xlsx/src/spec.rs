//! Shared XLSX specification models.

use std::path::PathBuf;

use thiserror::Error;

use crate::conf::{
    C_SHEET_NAME_DEFAULT, N_FONT_SIZE_DEFAULT, N_HEIGHT_ROW_EXCEL_MAX, N_WIDTH_COLUMN_EXCEL_MAX,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification; every field is an optional overlay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,

    /// Background fill color (`#RRGGBB`).
    pub bg_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
        }
    }

    /// Font size to use for autofit, falling back to [`N_FONT_SIZE_DEFAULT`].
    pub fn font_size_or_default(&self) -> i64 {
        self.font_size.unwrap_or(N_FONT_SIZE_DEFAULT)
    }
}

/// Normalized cell value held by the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnumCellValue {
    /// Missing/blank value.
    #[default]
    None,
    /// Text value.
    String(String),
    /// Numeric value (only produced when reopening an existing workbook).
    Number(f64),
}

impl EnumCellValue {
    /// Text content, if this is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// `true` for missing values and empty strings.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::String(s) => s.is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Stringified value as used for autofit measurement.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::String(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// One stored cell: value plus its resolved format.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecSheetCell {
    /// Cell value.
    pub value: EnumCellValue,
    /// Format applied when the cell is persisted.
    pub format: SpecCellFormat,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StoreOptions

/// Autofit policy for column widths and row heights.
///
/// Extent for a measured length `n` at font size `s` is
/// `n * s / font_size_ref + padding`, capped at the Excel maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecAutofitPolicy {
    /// Disable to leave widths/heights at Excel defaults.
    pub if_enabled: bool,
    /// Reference font size the measured length is scaled against.
    pub font_size_ref: f64,
    /// Constant margin added after scaling.
    pub padding: f64,
    /// Upper bound for column widths.
    pub width_max: f64,
    /// Upper bound for row heights.
    pub height_max: f64,
}

impl Default for SpecAutofitPolicy {
    fn default() -> Self {
        Self {
            if_enabled: true,
            font_size_ref: 12.0,
            padding: 2.0,
            width_max: N_WIDTH_COLUMN_EXCEL_MAX,
            height_max: N_HEIGHT_ROW_EXCEL_MAX,
        }
    }
}

/// Options for [`crate::store::SheetStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSheetStoreOptions {
    /// Name of the single active sheet (sanitized before use).
    pub sheet_name: String,
    /// Autofit policy applied after every append.
    pub policy_autofit: SpecAutofitPolicy,
    /// Format given to cells read back from an existing workbook.
    pub fmt_reopened: SpecCellFormat,
}

impl Default for SpecSheetStoreOptions {
    fn default() -> Self {
        Self {
            sheet_name: C_SHEET_NAME_DEFAULT.to_string(),
            policy_autofit: SpecAutofitPolicy::default(),
            fmt_reopened: SpecCellFormat::default(),
        }
    }
}

/// Exact-value fill rule applied by [`crate::highlight::apply_highlights`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecValueHighlight {
    /// Cell text that triggers the rule (case-sensitive, untrimmed).
    pub match_value: String,
    /// Background fill color (`#RRGGBB`).
    pub fill: String,
}

impl SpecValueHighlight {
    pub fn new(match_value: impl Into<String>, fill: impl Into<String>) -> Self {
        Self {
            match_value: match_value.into(),
            fill: fill.into(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Reports

/// Placement of one append call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecAppendReport {
    /// Zero-based row index of the first written row.
    pub row_start: usize,
    /// Number of rows written.
    pub cnt_rows: usize,
}

/// Per-rule match counts of one highlight pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecHighlightReport {
    /// Matched cell count, in rule order.
    pub cnt_cells_by_rule: Vec<usize>,
}

impl SpecHighlightReport {
    /// Total recolorings across all rules.
    pub fn cnt_cells_total(&self) -> usize {
        self.cnt_cells_by_rule.iter().sum()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Storage failures of the sheet store.
#[derive(Debug, Error)]
pub enum SheetStoreError {
    /// Filesystem access to the backing file failed.
    #[error("Failed to access backing file {}: {source}", path.display())]
    Io {
        /// Backing file path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Existing workbook could not be read back.
    #[error("Failed to read backing workbook {}: {message}", path.display())]
    Read {
        /// Backing file path.
        path: PathBuf,
        /// Reader error text.
        message: String,
    },
    /// Workbook serialization or save failed.
    #[error("Failed to write backing workbook {}: {source}", path.display())]
    Write {
        /// Backing file path.
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
    /// Append would exceed an Excel worksheet limit.
    #[error("Excel limit exceeded: {0}")]
    LimitExceeded(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SpecCellFormat;
    use crate::conf::{derive_default_cell_format, derive_default_header_format};

    #[test]
    fn test_header_preset_overlays_every_format_attribute() {
        let fmt_base = derive_default_cell_format();
        let fmt_header = derive_default_header_format();

        assert_eq!(
            fmt_header,
            SpecCellFormat {
                font_name: Some("Arial".to_string()),
                font_size: Some(12),
                bold: Some(true),
                align: Some("center".to_string()),
                valign: Some("vcenter".to_string()),
                bg_color: Some("#ADD8E6".to_string()),
            }
        );
        assert_eq!(fmt_base.bg_color, None);
        assert_eq!(fmt_base.font_size_or_default(), 14);
    }

    #[test]
    fn test_merge_keeps_left_values_where_right_is_none() {
        let fmt_fill = SpecCellFormat {
            bg_color: Some("#00FF00".to_string()),
            ..Default::default()
        };
        let fmt_merged = derive_default_header_format().with_(fmt_fill);
        assert_eq!(fmt_merged.bg_color.as_deref(), Some("#00FF00"));
        assert_eq!(fmt_merged.bold, Some(true));
        assert_eq!(SpecCellFormat::default().font_size_or_default(), 14);
    }
}
