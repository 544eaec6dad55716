//! End-of-run report model.

use std::fmt;
use std::path::PathBuf;

use crate::conf::{C_VERDICT_FAILED, C_VERDICT_PASSED};

/// Counters and per-file verdicts of one completed run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportRun {
    /// Files in the request.
    pub cnt_files_total: usize,
    /// Files merged into the workbook.
    pub cnt_files_processed: usize,
    /// Rows written, header included.
    pub cnt_rows_written: usize,
    /// Cells recolored by the highlight pass.
    pub cnt_cells_highlighted: usize,
    /// `(file, verdict)` in processing order.
    pub l_verdicts_by_file: Vec<(String, String)>,
    /// Workbook that was written.
    pub path_file_out: PathBuf,
}

impl ReportRun {
    /// Files whose verdict is exactly the pass text.
    pub fn cnt_passed(&self) -> usize {
        self.count_verdict(C_VERDICT_PASSED)
    }

    /// Files whose verdict is exactly the fail text.
    pub fn cnt_failed(&self) -> usize {
        self.count_verdict(C_VERDICT_FAILED)
    }

    fn count_verdict(&self, verdict: &str) -> usize {
        self.l_verdicts_by_file
            .iter()
            .filter(|(_, c_verdict)| c_verdict == verdict)
            .count()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} files={}/{} passed={} failed={} rows={} highlighted={} out={}",
            self.cnt_files_processed,
            self.cnt_files_total,
            self.cnt_passed(),
            self.cnt_failed(),
            self.cnt_rows_written,
            self.cnt_cells_highlighted,
            self.path_file_out.display()
        )
    }
}

impl fmt::Display for ReportRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[RUN]"))
    }
}

#[cfg(test)]
mod tests {
    use super::ReportRun;

    #[test]
    fn report_run_format_counts_verdicts() {
        let report = ReportRun {
            cnt_files_total: 3,
            cnt_files_processed: 3,
            cnt_rows_written: 7,
            cnt_cells_highlighted: 3,
            l_verdicts_by_file: vec![
                ("a.html".to_string(), "Test Result : PASSED".to_string()),
                ("b.html".to_string(), "Test Result : FAILED".to_string()),
                ("c.html".to_string(), "Test Result : SKIPPED".to_string()),
            ],
            path_file_out: "Tests_Results.xlsx".into(),
        };

        let txt = report.format("[RUN]");
        assert_eq!(
            txt,
            "[RUN] files=3/3 passed=1 failed=1 rows=7 highlighted=3 out=Tests_Results.xlsx"
        );
        assert_eq!(report.to_string(), txt);
    }
}
