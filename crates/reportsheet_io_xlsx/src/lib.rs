//! `reportsheet_io_xlsx` v1:
//! Append-only XLSX sheet store for aggregated test reports.
//!
//! Module layout:
//! - `conf`      : constants and default format presets
//! - `spec`      : cell/format models, options and errors
//! - `util`      : pure helper functions (offsets, autofit extents)
//! - `store`     : backing-file sheet store (open / append / persist)
//! - `highlight` : post-write conditional fill pass
pub mod conf;
pub mod highlight;
pub mod spec;
pub mod store;
pub mod util;

pub use conf::{
    N_HEIGHT_ROW_EXCEL_MAX, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    N_WIDTH_COLUMN_EXCEL_MAX, TUP_EXCEL_ILLEGAL, derive_default_cell_format,
    derive_default_data_format, derive_default_header_format,
};
pub use highlight::apply_highlights;
pub use spec::{
    EnumCellValue, SheetStoreError, SpecAppendReport, SpecAutofitPolicy, SpecCellFormat,
    SpecHighlightReport, SpecSheetCell, SpecSheetStoreOptions, SpecValueHighlight,
};
pub use store::SheetStore;
pub use util::{
    calculate_autofit_extent, calculate_display_len, derive_column_widths, derive_row_heights,
    is_sheet_logically_empty, plan_insert_row, sanitize_sheet_name,
};
