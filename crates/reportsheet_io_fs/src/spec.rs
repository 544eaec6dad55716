//! Listing specification models and top-level error types.

use std::path::PathBuf;

use thiserror::Error;

/// Include pattern used when none is given: any name ending in `html`.
pub const C_PATTERN_REPORT_DEFAULT: &str = "*html";

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Pattern matching mode for include/exclude lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumListPatternMode {
    /// Shell-like wildcards (`*`, `?`, character classes).
    Glob,
    /// Regular expression pattern.
    Regex,
    /// Substring match.
    Literal,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `list_files`.
#[derive(Debug, Clone)]
pub struct SpecListOptions {
    /// Include patterns applied to file basename.
    pub patterns_include_files: Option<Vec<String>>,
    /// Exclude patterns applied to file basename.
    pub patterns_exclude_files: Option<Vec<String>>,
    /// Pattern interpretation mode.
    pub rule_pattern: EnumListPatternMode,
    /// Sort names so runs are deterministic.
    pub if_sort: bool,
}

impl Default for SpecListOptions {
    fn default() -> Self {
        Self {
            patterns_include_files: Some(vec![C_PATTERN_REPORT_DEFAULT.to_string()]),
            patterns_exclude_files: None,
            rule_pattern: EnumListPatternMode::Glob,
            if_sort: true,
        }
    }
}

/// "Top-level call failed" errors of `list_files`.
#[derive(Debug, Error)]
pub enum ListFilesError {
    /// Input path is not a directory.
    #[error("Input is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// Directory entries could not be read.
    #[error("Failed to read directory {}: {source}", path.display())]
    Read {
        /// Directory being scanned.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Invalid include/exclude pattern.
    #[error("{0}")]
    InvalidPattern(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
