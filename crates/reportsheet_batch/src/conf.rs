//! Batch defaults and highlight presets.

use reportsheet_io_xlsx::SpecValueHighlight;

/// Output workbook written into the working directory by default.
pub const C_FILE_NAME_OUT_DEFAULT: &str = "Tests_Results.xlsx";
/// Synthetic header column holding each report's verdict.
pub const C_HEADER_OVERALL_RESULT: &str = "Overall Result";

/// Verdict text of a passing report.
pub const C_VERDICT_PASSED: &str = "Test Result : PASSED";
/// Verdict text of a failing report.
pub const C_VERDICT_FAILED: &str = "Test Result : FAILED";
/// Fill for cells equal to [`C_VERDICT_PASSED`].
pub const C_FILL_PASSED: &str = "#00FF00";
/// Fill for cells equal to [`C_VERDICT_FAILED`].
pub const C_FILL_FAILED: &str = "#FF0000";

/// Status line emitted once the output file is ready for appends.
pub const C_STATUS_BANNER: &str = "Tests Summary";
/// Status line emitted after the highlight pass.
pub const C_STATUS_COMPLETED: &str = "Excel file generated successfully";

/// Pass/fail fill rules, applied in this order.
pub fn derive_default_highlights() -> Vec<SpecValueHighlight> {
    vec![
        SpecValueHighlight::new(C_VERDICT_PASSED, C_FILL_PASSED),
        SpecValueHighlight::new(C_VERDICT_FAILED, C_FILL_FAILED),
    ]
}
