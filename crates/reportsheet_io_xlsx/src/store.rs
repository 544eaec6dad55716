//! Backing-file sheet store: append rows, autofit, persist.
//!
//! The store keeps the whole sheet in memory and rewrites the backing
//! workbook after every mutating call, so each successful `append` is durable
//! before it returns.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};
use tracing::debug;

use crate::conf::{N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
use crate::spec::{
    EnumCellValue, SheetStoreError, SpecAppendReport, SpecCellFormat, SpecSheetCell,
    SpecSheetStoreOptions,
};
use crate::util::{
    cast_col_num, cast_row_num, derive_column_widths, derive_row_heights,
    is_sheet_logically_empty, plan_insert_row, sanitize_sheet_name,
};

/// Single-sheet, append-only workbook bound to one backing file.
#[derive(Debug)]
pub struct SheetStore {
    path_file_out: PathBuf,
    sheet_name: String,
    options: SpecSheetStoreOptions,
    l_rows: Vec<Vec<SpecSheetCell>>,
    l_widths_by_col: Vec<Option<f64>>,
    l_heights_by_row: Vec<Option<f64>>,
    if_written: bool,
}

impl SheetStore {
    /// Open the backing file if present, else create an empty workbook there.
    ///
    /// Values of an existing workbook are read back from its first sheet;
    /// their formats are not recoverable and are set to
    /// [`SpecSheetStoreOptions::fmt_reopened`].
    pub fn open(
        path_file_out: impl Into<PathBuf>,
        options: SpecSheetStoreOptions,
    ) -> Result<Self, SheetStoreError> {
        let path_file_out = path_file_out.into();
        let mut store = Self {
            sheet_name: sanitize_sheet_name(&options.sheet_name, "_"),
            path_file_out,
            options,
            l_rows: Vec::new(),
            l_widths_by_col: Vec::new(),
            l_heights_by_row: Vec::new(),
            if_written: false,
        };

        if store.path_file_out.exists() {
            store.l_rows = load_rows(&store.path_file_out, &store.options.fmt_reopened)?;
            store.if_written = !is_sheet_logically_empty(&store.l_rows);
            debug!(
                path = %store.path_file_out.display(),
                n_rows = store.l_rows.len(),
                "reopened backing workbook"
            );
        } else {
            store.persist()?;
            debug!(path = %store.path_file_out.display(), "created backing workbook");
        }
        Ok(store)
    }

    /// Delete a backing file left by a previous run. Returns whether one existed.
    pub fn remove_existing(path_file_out: &Path) -> Result<bool, SheetStoreError> {
        match fs::remove_file(path_file_out) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(SheetStoreError::Io {
                path: path_file_out.to_path_buf(),
                source,
            }),
        }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path_file_out
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Committed rows, top to bottom.
    pub fn rows(&self) -> &[Vec<SpecSheetCell>] {
        &self.l_rows
    }

    /// Number of used rows.
    pub fn n_rows(&self) -> usize {
        self.l_rows.len()
    }

    /// Cell at zero-based `(row, col)`, if written.
    pub fn cell(&self, row: usize, col: usize) -> Option<&SpecSheetCell> {
        self.l_rows.get(row).and_then(|cells| cells.get(col))
    }

    /// Column widths from the last autofit; `None` keeps the Excel default.
    pub fn column_widths(&self) -> &[Option<f64>] {
        &self.l_widths_by_col
    }

    /// Row heights from the last autofit; `None` keeps the Excel default.
    pub fn row_heights(&self) -> &[Option<f64>] {
        &self.l_heights_by_row
    }

    /// See [`is_sheet_logically_empty`].
    pub fn is_logically_empty(&self) -> bool {
        is_sheet_logically_empty(&self.l_rows)
    }

    /// Mutable access to every stored cell, row-major.
    ///
    /// Changes become durable on the next [`Self::persist`].
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut SpecSheetCell> + '_ {
        self.l_rows.iter_mut().flatten()
    }

    /// Append `rows` with `fmt_hint` applied to every written cell.
    ///
    /// An empty `rows` is a no-op. The first non-empty append into a
    /// logically empty sheet lands at [`plan_insert_row`]; every later one
    /// goes directly below the last committed row, even when that row has
    /// a blank first cell. Widths/heights are then recomputed over the
    /// whole sheet using the hint's font size, and the workbook is saved.
    pub fn append(
        &mut self,
        rows: &[Vec<String>],
        fmt_hint: &SpecCellFormat,
    ) -> Result<SpecAppendReport, SheetStoreError> {
        let n_row_start = if self.if_written {
            self.l_rows.len()
        } else {
            plan_insert_row(&self.l_rows)
        };
        if rows.is_empty() {
            return Ok(SpecAppendReport {
                row_start: n_row_start,
                cnt_rows: 0,
            });
        }
        validate_append_limits(n_row_start, rows)?;

        for (n_offset, row) in rows.iter().enumerate() {
            let n_idx_row = n_row_start + n_offset;
            if n_idx_row == self.l_rows.len() {
                self.l_rows.push(Vec::with_capacity(row.len()));
            }
            let row_dst = &mut self.l_rows[n_idx_row];
            if row_dst.len() < row.len() {
                row_dst.resize_with(row.len(), SpecSheetCell::default);
            }
            for (n_idx_col, value) in row.iter().enumerate() {
                row_dst[n_idx_col] = SpecSheetCell {
                    value: EnumCellValue::from(value.as_str()),
                    format: fmt_hint.clone(),
                };
            }
        }

        self.if_written = true;
        self.refresh_autofit(fmt_hint.font_size_or_default());
        self.persist()?;

        debug!(
            row_start = n_row_start,
            cnt_rows = rows.len(),
            n_rows_total = self.l_rows.len(),
            "appended rows"
        );
        Ok(SpecAppendReport {
            row_start: n_row_start,
            cnt_rows: rows.len(),
        })
    }

    /// Rewrite the backing workbook from the in-memory sheet.
    pub fn persist(&self) -> Result<(), SheetStoreError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet_name)
            .map_err(|source| self.derive_write_error(source))?;

        let mut dict_formats: HashMap<&SpecCellFormat, Format> = HashMap::new();
        for (n_idx_row, row) in self.l_rows.iter().enumerate() {
            for (n_idx_col, cell) in row.iter().enumerate() {
                let format = dict_formats
                    .entry(&cell.format)
                    .or_insert_with(|| derive_rust_xlsx_format(&cell.format));
                write_cell_with_format(worksheet, n_idx_row, n_idx_col, cell, format)
                    .map_err(|err| self.derive_cell_error(err))?;
            }
        }

        for (n_idx_col, width) in self.l_widths_by_col.iter().enumerate() {
            if let Some(width) = width {
                worksheet
                    .set_column_width(
                        cast_col_num(n_idx_col).map_err(SheetStoreError::LimitExceeded)?,
                        *width,
                    )
                    .map_err(|source| self.derive_write_error(source))?;
            }
        }
        for (n_idx_row, height) in self.l_heights_by_row.iter().enumerate() {
            if let Some(height) = height {
                worksheet
                    .set_row_height(
                        cast_row_num(n_idx_row).map_err(SheetStoreError::LimitExceeded)?,
                        *height,
                    )
                    .map_err(|source| self.derive_write_error(source))?;
            }
        }

        workbook
            .save(&self.path_file_out)
            .map_err(|source| self.derive_write_error(source))
    }

    fn refresh_autofit(&mut self, n_font_size: i64) {
        let policy = &self.options.policy_autofit;
        if !policy.if_enabled {
            return;
        }
        self.l_widths_by_col = derive_column_widths(&self.l_rows, n_font_size, policy);
        self.l_heights_by_row = derive_row_heights(&self.l_rows, n_font_size, policy);
    }

    fn derive_write_error(&self, source: XlsxError) -> SheetStoreError {
        SheetStoreError::Write {
            path: self.path_file_out.clone(),
            source,
        }
    }

    fn derive_cell_error(&self, err: EnumCellWriteError) -> SheetStoreError {
        match err {
            EnumCellWriteError::Index(msg) => SheetStoreError::LimitExceeded(msg),
            EnumCellWriteError::Xlsx(source) => self.derive_write_error(source),
        }
    }
}

enum EnumCellWriteError {
    Index(String),
    Xlsx(XlsxError),
}

fn validate_append_limits(n_row_start: usize, rows: &[Vec<String>]) -> Result<(), SheetStoreError> {
    let n_row_end = n_row_start + rows.len();
    if n_row_end > N_NROWS_EXCEL_MAX {
        return Err(SheetStoreError::LimitExceeded(format!(
            "appending {} rows at row {n_row_start} exceeds {N_NROWS_EXCEL_MAX} rows",
            rows.len()
        )));
    }
    if let Some(n_width) = rows.iter().map(Vec::len).max()
        && n_width > N_NCOLS_EXCEL_MAX
    {
        return Err(SheetStoreError::LimitExceeded(format!(
            "row with {n_width} cells exceeds {N_NCOLS_EXCEL_MAX} columns"
        )));
    }
    Ok(())
}

fn load_rows(
    path_file: &Path,
    fmt_reopened: &SpecCellFormat,
) -> Result<Vec<Vec<SpecSheetCell>>, SheetStoreError> {
    let derive_read_error = |message: String| SheetStoreError::Read {
        path: path_file.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook::<Xlsx<_>, _>(path_file)
        .map_err(|err| derive_read_error(err.to_string()))?;
    let Some(res_range) = workbook.worksheet_range_at(0) else {
        return Ok(Vec::new());
    };
    let range = res_range.map_err(|err| derive_read_error(err.to_string()))?;
    let Some((n_row_start, n_col_start)) = range.start() else {
        return Ok(Vec::new());
    };

    let mut l_rows: Vec<Vec<SpecSheetCell>> = vec![Vec::new(); n_row_start as usize];
    for row in range.rows() {
        let mut l_cells: Vec<SpecSheetCell> = (0..n_col_start)
            .map(|_| SpecSheetCell::default())
            .collect();
        l_cells.extend(row.iter().map(|data| SpecSheetCell {
            value: derive_cell_value_from_data(data),
            format: fmt_reopened.clone(),
        }));
        while l_cells.last().is_some_and(|cell| cell.value.is_empty()) {
            l_cells.pop();
        }
        l_rows.push(l_cells);
    }
    Ok(l_rows)
}

fn derive_cell_value_from_data(data: &Data) -> EnumCellValue {
    match data {
        Data::Empty => EnumCellValue::None,
        Data::String(s) => EnumCellValue::String(s.clone()),
        Data::Float(n) => EnumCellValue::Number(*n),
        Data::Int(n) => EnumCellValue::Number(*n as f64),
        other => EnumCellValue::String(other.to_string()),
    }
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    cell: &SpecSheetCell,
    format: &Format,
) -> Result<(), EnumCellWriteError> {
    let n_row = cast_row_num(row_idx).map_err(EnumCellWriteError::Index)?;
    let n_col = cast_col_num(col_idx).map_err(EnumCellWriteError::Index)?;
    match &cell.value {
        EnumCellValue::None => {
            if cell.format == SpecCellFormat::default() {
                return Ok(());
            }
            worksheet
                .write_blank(n_row, n_col, format)
                .map_err(EnumCellWriteError::Xlsx)?;
        }
        EnumCellValue::String(val) if val.is_empty() => {
            worksheet
                .write_blank(n_row, n_col, format)
                .map_err(EnumCellWriteError::Xlsx)?;
        }
        EnumCellValue::String(val) => {
            worksheet
                .write_string_with_format(n_row, n_col, val, format)
                .map_err(EnumCellWriteError::Xlsx)?;
        }
        EnumCellValue::Number(val) => {
            worksheet
                .write_number_with_format(n_row, n_col, *val, format)
                .map_err(EnumCellWriteError::Xlsx)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }

    format
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "fill" => Some(FormatAlign::Fill),
        "justify" => Some(FormatAlign::Justify),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}
