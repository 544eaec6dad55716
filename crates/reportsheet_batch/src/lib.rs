//! `reportsheet_batch` v1:
//! Batch consolidation of HTML test reports into one workbook.
//!
//! Module layout:
//! - `conf`      : output defaults, verdict texts and highlight presets
//! - `spec`      : records, events, run request/options and errors
//! - `source`    : document source trait and the HTML table reader
//! - `extract`   : rendered table -> report record
//! - `aggregate` : header-once merge of records into the sheet store
//! - `report`    : end-of-run summary
//! - `runner`    : batch state machine and background worker
pub mod aggregate;
pub mod conf;
pub mod extract;
pub mod report;
pub mod runner;
pub mod source;
pub mod spec;

pub use aggregate::ResultAggregator;
pub use conf::{
    C_FILE_NAME_OUT_DEFAULT, C_HEADER_OVERALL_RESULT, C_STATUS_BANNER, C_STATUS_COMPLETED,
    C_VERDICT_FAILED, C_VERDICT_PASSED, derive_default_highlights,
};
pub use extract::extract_report;
pub use report::ReportRun;
pub use runner::{BatchRunner, RunHandle, spawn_batch_run};
pub use source::{DocumentSource, HtmlTableSource};
pub use spec::{
    DocumentSourceError, EnumRunEvent, EnumRunFailureKind, EnumRunState, ExtractError, RunError,
    SpecProgressEvent, SpecRenderedTable, SpecReportRecord, SpecRunFailure, SpecRunOptions,
    SpecRunRequest,
};
