//! XLSX constants and default preset factories.

use crate::spec::SpecCellFormat;

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Excel maximum column width in character units.
pub const N_WIDTH_COLUMN_EXCEL_MAX: f64 = 255.0;
/// Excel maximum row height in points.
pub const N_HEIGHT_ROW_EXCEL_MAX: f64 = 409.0;

/// Sheet name used for the single active sheet.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet";
/// Font size assumed when a style hint carries none.
pub const N_FONT_SIZE_DEFAULT: i64 = 14;

/// Base cell format: Arial 14, centered both ways.
///
/// Every preset below is an overlay on this one.
pub fn derive_default_cell_format() -> SpecCellFormat {
    SpecCellFormat {
        font_name: Some("Arial".to_string()),
        font_size: Some(N_FONT_SIZE_DEFAULT),
        bold: Some(false),
        align: Some("center".to_string()),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    }
}

/// Header row format: bold Arial 12 on a light blue fill.
pub fn derive_default_header_format() -> SpecCellFormat {
    derive_default_cell_format().with_(SpecCellFormat {
        font_size: Some(12),
        bold: Some(true),
        bg_color: Some("#ADD8E6".to_string()),
        ..Default::default()
    })
}

/// Data row format: regular Arial 12.
pub fn derive_default_data_format() -> SpecCellFormat {
    derive_default_cell_format().with_(SpecCellFormat {
        font_size: Some(12),
        ..Default::default()
    })
}
