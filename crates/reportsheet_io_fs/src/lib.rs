//! `reportsheet_io_fs` v1:
//! Report file discovery for batch runs.
//!
//! - `list`   : directory scan and listing report
//! - `spec`   : enums/options/errors
//! - `util`   : pattern compilation and matching

pub mod list;
pub mod spec;
mod util;

pub use list::{ReportList, list_files};
pub use spec::{C_PATTERN_REPORT_DEFAULT, EnumListPatternMode, ListFilesError, SpecListOptions};
