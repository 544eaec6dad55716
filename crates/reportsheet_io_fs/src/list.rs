//! Directory listing of report files.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::spec::{ListFilesError, SpecListOptions};
use crate::util::SpecListPatterns;

/// Result of one `list_files` call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportList {
    /// Regular-file entries seen in the directory.
    pub cnt_scanned: u64,
    /// Selected file names (basenames), in listing order.
    pub l_names: Vec<String>,
}

impl ReportList {
    /// Number of selected files.
    pub fn cnt_matched(&self) -> usize {
        self.l_names.len()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} scanned={} matched={}",
            self.cnt_scanned,
            self.cnt_matched()
        )
    }
}

impl fmt::Display for ReportList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[LIST]"))
    }
}

/// List file names directly inside `dir_input` that pass the include/exclude
/// patterns.
///
/// Subdirectories are not descended into and are never listed. Names that
/// are not valid UTF-8 are skipped.
pub fn list_files(dir_input: &Path, options: &SpecListOptions) -> Result<ReportList, ListFilesError> {
    if !dir_input.is_dir() {
        return Err(ListFilesError::NotADirectory(dir_input.to_path_buf()));
    }
    let patterns = SpecListPatterns::from_raw(
        options.patterns_include_files.as_deref(),
        options.patterns_exclude_files.as_deref(),
        options.rule_pattern,
    )?;

    let derive_read_error = |source| ListFilesError::Read {
        path: dir_input.to_path_buf(),
        source,
    };

    let mut report = ReportList::default();
    for entry in fs::read_dir(dir_input).map_err(derive_read_error)? {
        let entry = entry.map_err(derive_read_error)?;
        let file_type = entry.file_type().map_err(derive_read_error)?;
        if file_type.is_dir() {
            continue;
        }
        if file_type.is_symlink() && !entry.path().is_file() {
            continue;
        }
        report.cnt_scanned += 1;

        let Ok(c_name) = entry.file_name().into_string() else {
            debug!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if patterns.should_keep(&c_name) {
            report.l_names.push(c_name);
        }
    }

    if options.if_sort {
        report.l_names.sort();
    }
    debug!(dir = %dir_input.display(), "{report}");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::list_files;
    use crate::spec::{EnumListPatternMode, ListFilesError, SpecListOptions};

    fn write_files(dir: &std::path::Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), "<html></html>").expect("write fixture");
        }
    }

    #[test]
    fn test_default_options_select_sorted_html_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_files(
            dir.path(),
            &["b.html", "a.html", "notes.txt", "c.HTML", "d.xhtml", "e.html.bak"],
        );
        fs::create_dir(dir.path().join("nested.html")).expect("mkdir");

        let report = list_files(dir.path(), &SpecListOptions::default()).expect("list");
        assert_eq!(report.l_names, vec!["a.html", "b.html", "d.xhtml"]);
        assert_eq!(report.cnt_scanned, 6);
        assert_eq!(report.to_string(), "[LIST] scanned=6 matched=3");
    }

    #[test]
    fn test_exclude_patterns_and_literal_mode() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_files(dir.path(), &["smoke_1.html", "smoke_2.html", "full_1.html"]);

        let options = SpecListOptions {
            patterns_include_files: Some(vec!["smoke".to_string()]),
            patterns_exclude_files: Some(vec!["_2".to_string()]),
            rule_pattern: EnumListPatternMode::Literal,
            ..Default::default()
        };
        let report = list_files(dir.path(), &options).expect("list");
        assert_eq!(report.l_names, vec!["smoke_1.html"]);
    }

    #[test]
    fn test_empty_directory_yields_no_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = list_files(dir.path(), &SpecListOptions::default()).expect("list");
        assert_eq!(report.cnt_matched(), 0);
    }

    #[test]
    fn test_non_directory_input_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path_file = dir.path().join("a.html");
        write_files(dir.path(), &["a.html"]);

        let err = list_files(&path_file, &SpecListOptions::default()).unwrap_err();
        assert!(matches!(err, ListFilesError::NotADirectory(_)));
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let options = SpecListOptions {
            patterns_include_files: Some(vec!["[".to_string()]),
            ..Default::default()
        };
        let err = list_files(dir.path(), &options).unwrap_err();
        assert!(matches!(err, ListFilesError::InvalidPattern(_)));
    }
}
