//! Batch specification models, events and error types.

use std::path::PathBuf;

use reportsheet_io_fs::{ListFilesError, SpecListOptions, list_files};
use reportsheet_io_xlsx::{
    SheetStoreError, SpecCellFormat, SpecSheetStoreOptions, SpecValueHighlight,
    derive_default_data_format, derive_default_header_format,
};
use thiserror::Error;

use crate::conf::derive_default_highlights;
use crate::report::ReportRun;

////////////////////////////////////////////////////////////////////////////////
// #region Records

/// Table content as a document source renders it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecRenderedTable {
    /// Text of every `th` cell in the table, in document order.
    pub header_cells: Vec<String>,
    /// `td` texts of each `tr`, in document order. Rows may be empty.
    pub rows: Vec<Vec<String>>,
}

/// Structured content of one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecReportRecord {
    /// Header row including the verdict column; `None` when not captured.
    pub headers: Option<Vec<String>>,
    /// Data rows; only the first one carries the verdict as a trailing cell.
    pub data_rows: Vec<Vec<String>>,
    /// First cell of the report's last row.
    pub verdict: String,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RunInputs

/// What to process and where to write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRunRequest {
    /// Directory holding the report files.
    pub dir_input: PathBuf,
    /// File names relative to `dir_input`, processed in this order.
    pub files: Vec<String>,
    /// Output workbook path; replaced at run start.
    pub path_file_out: PathBuf,
}

impl SpecRunRequest {
    /// Build a request from the files `list_files` selects in `dir_input`.
    pub fn from_directory(
        dir_input: impl Into<PathBuf>,
        path_file_out: impl Into<PathBuf>,
        options: &SpecListOptions,
    ) -> Result<Self, ListFilesError> {
        let dir_input = dir_input.into();
        let report = list_files(&dir_input, options)?;
        Ok(Self {
            dir_input,
            files: report.l_names,
            path_file_out: path_file_out.into(),
        })
    }

    /// Absolute or relative path of one listed file.
    pub fn path_of(&self, file: &str) -> PathBuf {
        self.dir_input.join(file)
    }
}

/// Styling and storage options for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecRunOptions {
    /// Format of the header row.
    pub fmt_header: SpecCellFormat,
    /// Format of every data row.
    pub fmt_data: SpecCellFormat,
    /// Fill rules applied after the last file.
    pub l_highlights: Vec<SpecValueHighlight>,
    /// Sheet store options.
    pub options_store: SpecSheetStoreOptions,
}

impl Default for SpecRunOptions {
    fn default() -> Self {
        Self {
            fmt_header: derive_default_header_format(),
            fmt_data: derive_default_data_format(),
            l_highlights: derive_default_highlights(),
            options_store: SpecSheetStoreOptions::default(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RunEvents

/// Progress after one successfully processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecProgressEvent {
    /// Files done so far, 1-based.
    pub processed_count: usize,
    /// Files in the request.
    pub total_count: usize,
    /// Names the file and its verdict.
    pub status_text: String,
}

impl SpecProgressEvent {
    /// Integer completion percentage in `0..=100`.
    pub fn percent(&self) -> u8 {
        if self.total_count == 0 {
            return 0;
        }
        let n_percent = self.processed_count.min(self.total_count) * 100 / self.total_count;
        n_percent as u8
    }
}

/// Coarse failure class a front-end reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumRunFailureKind {
    /// Nothing was selected to process.
    NoInputFiles,
    /// A report had no table or an unusable one, or could not be read.
    InvalidReport,
    /// The output workbook could not be read or written.
    IoFailure,
    /// The background worker died before reporting.
    Interrupted,
}

/// Terminal failure payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRunFailure {
    pub kind: EnumRunFailureKind,
    pub message: String,
}

impl From<&RunError> for SpecRunFailure {
    fn from(err: &RunError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Events emitted by a run, in processing order.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumRunEvent {
    /// Run accepted a non-empty request.
    Started { total_count: usize },
    /// Free-form status line.
    Status(String),
    /// One more file is durable in the workbook.
    Progress(SpecProgressEvent),
    /// All files merged and highlighted.
    Completed(ReportRun),
    /// Run aborted; rows already written stay on disk.
    Failed(SpecRunFailure),
}

/// Lifecycle of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumRunState {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

impl EnumRunState {
    /// State after observing `event`. Events that do not apply leave it unchanged.
    pub fn advance(self, event: &EnumRunEvent) -> Self {
        match (self, event) {
            (Self::Idle, EnumRunEvent::Started { .. }) => Self::Running,
            (Self::Running, EnumRunEvent::Completed(_)) => Self::Completed,
            (Self::Idle | Self::Running, EnumRunEvent::Failed(_)) => Self::Failed,
            (state, _) => state,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Failure of a document source to produce a table.
#[derive(Debug, Error)]
pub enum DocumentSourceError {
    /// Document could not be read.
    #[error("Failed to read document {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Structural problems of one rendered report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("document contains no table")]
    MissingTable,
    #[error("{0}")]
    MalformedReport(String),
}

/// Terminal errors of a batch run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("No report files selected")]
    NoInputFiles,
    #[error("Report {file} contains no table")]
    MissingTable { file: String },
    #[error("Report {file} is malformed: {reason}")]
    MalformedReport { file: String, reason: String },
    #[error("Failed to load report {file}: {source}")]
    Source {
        file: String,
        #[source]
        source: DocumentSourceError,
    },
    #[error(transparent)]
    IoFailure(#[from] SheetStoreError),
    #[error("Batch worker stopped unexpectedly")]
    Interrupted,
}

impl RunError {
    /// Attach the file name to an extraction error.
    pub fn from_extract(file: &str, err: ExtractError) -> Self {
        match err {
            ExtractError::MissingTable => Self::MissingTable {
                file: file.to_string(),
            },
            ExtractError::MalformedReport(reason) => Self::MalformedReport {
                file: file.to_string(),
                reason,
            },
        }
    }

    pub fn kind(&self) -> EnumRunFailureKind {
        match self {
            Self::NoInputFiles => EnumRunFailureKind::NoInputFiles,
            Self::MissingTable { .. } | Self::MalformedReport { .. } | Self::Source { .. } => {
                EnumRunFailureKind::InvalidReport
            }
            Self::IoFailure(_) => EnumRunFailureKind::IoFailure,
            Self::Interrupted => EnumRunFailureKind::Interrupted,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
