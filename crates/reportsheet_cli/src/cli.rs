use std::path::PathBuf;

use clap::Parser;
use reportsheet_batch::{C_FILE_NAME_OUT_DEFAULT, EnumRunFailureKind, SpecRunFailure};
use reportsheet_io_fs::{C_PATTERN_REPORT_DEFAULT, EnumListPatternMode, SpecListOptions};

#[derive(Parser, Debug)]
#[command(
    name = "reportsheet",
    version,
    about = "Consolidate HTML test reports into one highlighted Excel workbook"
)]
pub struct Cli {
    /// Directory containing the HTML report files
    pub dir_input: PathBuf,

    /// Output workbook; replaced if it exists
    #[arg(short, long, default_value = C_FILE_NAME_OUT_DEFAULT)]
    pub output: PathBuf,

    /// Include pattern for report file names (repeatable)
    #[arg(long = "pattern", default_value = C_PATTERN_REPORT_DEFAULT)]
    pub patterns: Vec<String>,

    /// Exclude pattern for report file names (repeatable)
    #[arg(long = "exclude")]
    pub excludes: Vec<String>,

    /// Treat patterns as regular expressions instead of globs
    #[arg(long)]
    pub regex: bool,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn derive_list_options(&self) -> SpecListOptions {
        SpecListOptions {
            patterns_include_files: Some(self.patterns.clone()),
            patterns_exclude_files: (!self.excludes.is_empty()).then(|| self.excludes.clone()),
            rule_pattern: if self.regex {
                EnumListPatternMode::Regex
            } else {
                EnumListPatternMode::Glob
            },
            if_sort: true,
        }
    }
}

/// User-facing line for a failed run.
pub fn derive_failure_message(failure: &SpecRunFailure) -> String {
    match failure.kind {
        EnumRunFailureKind::NoInputFiles => {
            "No report files found. Please select a directory with HTML files.".to_string()
        }
        EnumRunFailureKind::InvalidReport => {
            format!("Empty or invalid report file: {}", failure.message)
        }
        EnumRunFailureKind::IoFailure => format!("Failed to write workbook: {}", failure.message),
        EnumRunFailureKind::Interrupted => failure.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use reportsheet_batch::{EnumRunFailureKind, SpecRunFailure};
    use reportsheet_io_fs::EnumListPatternMode;

    use super::{Cli, derive_failure_message};

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["reportsheet", "reports"]).expect("parse");
        assert_eq!(cli.output.to_str(), Some("Tests_Results.xlsx"));

        let options = cli.derive_list_options();
        assert_eq!(options.patterns_include_files, Some(vec!["*html".to_string()]));
        assert_eq!(options.patterns_exclude_files, None);
        assert_eq!(options.rule_pattern, EnumListPatternMode::Glob);
    }

    #[test]
    fn test_repeated_patterns_and_verbosity() {
        let cli = Cli::try_parse_from([
            "reportsheet",
            "reports",
            "--pattern",
            "*.htm",
            "--pattern",
            "*.html",
            "--exclude",
            "draft_*",
            "-vv",
        ])
        .expect("parse");
        assert_eq!(cli.patterns, vec!["*.htm", "*.html"]);
        assert_eq!(cli.excludes, vec!["draft_*"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_failure_messages_differ_by_kind() {
        let no_files = derive_failure_message(&SpecRunFailure {
            kind: EnumRunFailureKind::NoInputFiles,
            message: "No report files selected".to_string(),
        });
        let invalid = derive_failure_message(&SpecRunFailure {
            kind: EnumRunFailureKind::InvalidReport,
            message: "Report a.html contains no table".to_string(),
        });
        assert!(no_files.starts_with("No report files"));
        assert_eq!(invalid, "Empty or invalid report file: Report a.html contains no table");
    }
}
