//! Batch runner: drives source -> extract -> aggregate -> highlight over a
//! file list and reports through events.

use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use reportsheet_io_xlsx::{SheetStore, apply_highlights};
use tracing::{debug, error, info, warn};

use crate::aggregate::ResultAggregator;
use crate::conf::{C_STATUS_BANNER, C_STATUS_COMPLETED};
use crate::extract::extract_report;
use crate::report::ReportRun;
use crate::source::DocumentSource;
use crate::spec::{
    EnumRunEvent, RunError, SpecProgressEvent, SpecRunFailure, SpecRunOptions, SpecRunRequest,
};

/// Consolidates one request into one workbook.
#[derive(Debug, Clone)]
pub struct BatchRunner<S> {
    source: S,
    options: SpecRunOptions,
}

impl<S: DocumentSource> BatchRunner<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, SpecRunOptions::default())
    }

    pub fn with_options(source: S, options: SpecRunOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &SpecRunOptions {
        &self.options
    }

    /// Run the batch, sending events to `sink` in processing order.
    ///
    /// The last event is always `Completed` or `Failed`. An empty file list
    /// emits `Failed` alone and never touches the output file; otherwise the
    /// first event is `Started`. On any later failure the rows of files
    /// merged before it remain on disk.
    pub fn run(
        &self,
        request: &SpecRunRequest,
        sink: &mut dyn FnMut(EnumRunEvent),
    ) -> Result<ReportRun, RunError> {
        info!(
            dir = %request.dir_input.display(),
            cnt_files = request.files.len(),
            out = %request.path_file_out.display(),
            "batch run started"
        );
        if request.files.is_empty() {
            let err = RunError::NoInputFiles;
            error!(kind = ?err.kind(), "batch run failed: {err}");
            sink(EnumRunEvent::Failed(SpecRunFailure::from(&err)));
            return Err(err);
        }
        sink(EnumRunEvent::Started {
            total_count: request.files.len(),
        });

        match self.run_files(request, sink) {
            Ok(report) => {
                info!("{report}");
                sink(EnumRunEvent::Status(C_STATUS_COMPLETED.to_string()));
                sink(EnumRunEvent::Completed(report.clone()));
                Ok(report)
            }
            Err(err) => {
                error!(kind = ?err.kind(), "batch run failed: {err}");
                sink(EnumRunEvent::Failed(SpecRunFailure::from(&err)));
                Err(err)
            }
        }
    }

    fn run_files(
        &self,
        request: &SpecRunRequest,
        sink: &mut dyn FnMut(EnumRunEvent),
    ) -> Result<ReportRun, RunError> {
        if SheetStore::remove_existing(&request.path_file_out)? {
            warn!(
                path = %request.path_file_out.display(),
                "replaced output file of a previous run"
            );
        }
        let mut store =
            SheetStore::open(&request.path_file_out, self.options.options_store.clone())?;
        sink(EnumRunEvent::Status(C_STATUS_BANNER.to_string()));

        let n_total = request.files.len();
        let mut report = ReportRun {
            cnt_files_total: n_total,
            path_file_out: request.path_file_out.clone(),
            ..Default::default()
        };

        {
            let mut aggregator =
                ResultAggregator::new(&mut store, &self.options.fmt_header, &self.options.fmt_data);
            for (n_idx, file) in request.files.iter().enumerate() {
                let table = self
                    .source
                    .load_table(&request.path_of(file))
                    .map_err(|source| RunError::Source {
                        file: file.clone(),
                        source,
                    })?;
                let record = extract_report(table.as_ref(), aggregator.if_awaiting_header())
                    .map_err(|err| RunError::from_extract(file, err))?;
                let verdict = record.verdict.clone();

                report.cnt_rows_written += aggregator.merge(record)?;
                report.cnt_files_processed += 1;
                report
                    .l_verdicts_by_file
                    .push((file.clone(), verdict.clone()));
                debug!(file = %file, verdict = %verdict, "report merged");

                sink(EnumRunEvent::Status(format!("Test File: {file}")));
                sink(EnumRunEvent::Progress(SpecProgressEvent {
                    processed_count: n_idx + 1,
                    total_count: n_total,
                    status_text: format!("{file}: {verdict}"),
                }));
            }
        }

        let report_highlight = apply_highlights(&mut store, &self.options.l_highlights)?;
        report.cnt_cells_highlighted = report_highlight.cnt_cells_total();
        Ok(report)
    }
}

/// Handle to a run executing on its own thread.
#[derive(Debug)]
pub struct RunHandle {
    events: Receiver<EnumRunEvent>,
    handle: JoinHandle<Result<ReportRun, RunError>>,
}

impl RunHandle {
    /// Events in emission order; the channel closes when the run ends.
    pub fn events(&self) -> &Receiver<EnumRunEvent> {
        &self.events
    }

    /// Block until the run ends and return its outcome.
    pub fn wait(self) -> Result<ReportRun, RunError> {
        self.handle.join().unwrap_or(Err(RunError::Interrupted))
    }
}

/// Start `runner` on a dedicated thread.
///
/// Events are delivered even if nobody listens; dropping the receiver does
/// not stop the run.
pub fn spawn_batch_run<S>(runner: BatchRunner<S>, request: SpecRunRequest) -> RunHandle
where
    S: DocumentSource + Send + 'static,
{
    let (tx, events) = mpsc::channel();
    let handle = thread::spawn(move || {
        let mut sink = |event: EnumRunEvent| {
            let _ = tx.send(event);
        };
        runner.run(&request, &mut sink)
    });
    RunHandle { events, handle }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use calamine::{Data, Reader, Xlsx, open_workbook};
    use reportsheet_io_fs::SpecListOptions;

    use super::{BatchRunner, spawn_batch_run};
    use crate::conf::{C_VERDICT_FAILED, C_VERDICT_PASSED};
    use crate::source::HtmlTableSource;
    use crate::spec::{EnumRunEvent, EnumRunFailureKind, EnumRunState, RunError, SpecRunRequest};

    fn derive_report_html(rows: &[&[&str]], verdict: &str) -> String {
        let mut c_html = String::from("<html><body><table><tr><th>Name</th><th>Status</th></tr>");
        for row in rows {
            c_html.push_str("<tr>");
            for cell in *row {
                c_html.push_str(&format!("<td>{cell}</td>"));
            }
            c_html.push_str("</tr>");
        }
        c_html.push_str(&format!("<tr><td>{verdict}</td></tr></table></body></html>"));
        c_html
    }

    fn write_report(dir: &Path, name: &str, html: &str) {
        fs::write(dir.join(name), html).expect("write fixture");
    }

    fn derive_request(dir: &Path) -> SpecRunRequest {
        SpecRunRequest::from_directory(dir, dir.join("out.xlsx"), &SpecListOptions::default())
            .expect("request")
    }

    fn derive_runner() -> BatchRunner<HtmlTableSource> {
        BatchRunner::new(HtmlTableSource::new().expect("patterns compile"))
    }

    fn run_collect(
        runner: &BatchRunner<HtmlTableSource>,
        request: &SpecRunRequest,
    ) -> (Result<crate::report::ReportRun, RunError>, Vec<EnumRunEvent>) {
        let mut l_events = Vec::new();
        let res = runner.run(request, &mut |event| l_events.push(event));
        (res, l_events)
    }

    fn read_values(path: &PathBuf) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = open_workbook(path).expect("open workbook");
        let range = workbook
            .worksheet_range_at(0)
            .expect("first sheet")
            .expect("read range");
        range
            .rows()
            .map(|row| {
                let mut l_values: Vec<String> = row
                    .iter()
                    .map(|data| match data {
                        Data::Empty => String::new(),
                        other => other.to_string(),
                    })
                    .collect();
                while l_values.last().is_some_and(String::is_empty) {
                    l_values.pop();
                }
                l_values
            })
            .collect()
    }

    fn derive_strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_two_passing_reports_build_three_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_report(dir.path(), "a.html", &derive_report_html(&[&["t1", "ok"]], C_VERDICT_PASSED));
        write_report(dir.path(), "b.html", &derive_report_html(&[&["t2", "ok"]], C_VERDICT_PASSED));
        let request = derive_request(dir.path());

        let (res, l_events) = run_collect(&derive_runner(), &request);
        let report = res.expect("run");

        assert_eq!(
            read_values(&request.path_file_out),
            vec![
                derive_strings(&["Name", "Status", "Overall Result"]),
                derive_strings(&["t1", "ok", C_VERDICT_PASSED]),
                derive_strings(&["t2", "ok", C_VERDICT_PASSED]),
            ]
        );
        assert_eq!(report.cnt_files_processed, 2);
        assert_eq!(report.cnt_rows_written, 3);
        assert_eq!(report.cnt_cells_highlighted, 2);
        assert_eq!(report.cnt_passed(), 2);
        assert!(matches!(l_events.last(), Some(EnumRunEvent::Completed(_))));
    }

    #[test]
    fn test_only_first_data_row_gets_verdict_column() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_report(
            dir.path(),
            "a.html",
            &derive_report_html(&[&["t1", "ok"], &["t2", "ok"]], C_VERDICT_FAILED),
        );
        let request = derive_request(dir.path());

        derive_runner().run(&request, &mut |_| {}).expect("run");
        let l_rows = read_values(&request.path_file_out);
        assert_eq!(l_rows.len(), 3);
        assert_eq!(l_rows[1].len(), 3);
        assert_eq!(l_rows[2].len(), 2);
    }

    #[test]
    fn test_empty_selection_fails_without_touching_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let request = derive_request(dir.path());
        fs::write(&request.path_file_out, b"previous").expect("write stale output");

        let (res, l_events) = run_collect(&derive_runner(), &request);
        assert!(matches!(res, Err(RunError::NoInputFiles)));
        assert_eq!(fs::read(&request.path_file_out).expect("read"), b"previous");

        let state = l_events
            .iter()
            .fold(EnumRunState::Idle, |state, event| state.advance(event));
        assert_eq!(state, EnumRunState::Failed);
        assert_eq!(l_events.len(), 1);
        match l_events.last() {
            Some(EnumRunEvent::Failed(failure)) => {
                assert_eq!(failure.kind, EnumRunFailureKind::NoInputFiles)
            }
            other => panic!("unexpected last event: {other:?}"),
        }
    }

    #[test]
    fn test_storage_failure_aborts_with_io_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_report(dir.path(), "a.html", &derive_report_html(&[&["t1", "ok"]], C_VERDICT_PASSED));
        let mut request = derive_request(dir.path());
        request.path_file_out = dir.path().join("missing").join("out.xlsx");

        let (res, l_events) = run_collect(&derive_runner(), &request);
        assert!(matches!(res, Err(RunError::IoFailure(_))));
        assert!(!request.path_file_out.exists());
        assert!(
            !l_events
                .iter()
                .any(|event| matches!(event, EnumRunEvent::Progress(_)))
        );
        match l_events.last() {
            Some(EnumRunEvent::Failed(failure)) => {
                assert_eq!(failure.kind, EnumRunFailureKind::IoFailure)
            }
            other => panic!("unexpected last event: {other:?}"),
        }
    }

    #[test]
    fn test_blank_first_header_cell_keeps_header_row() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_report(
            dir.path(),
            "a.html",
            &format!(
                "<table><tr><th></th><th>Status</th></tr><tr><td>t1</td><td>ok</td></tr>\
                 <tr><td>{C_VERDICT_PASSED}</td></tr></table>"
            ),
        );
        let request = derive_request(dir.path());

        let report = derive_runner().run(&request, &mut |_| {}).expect("run");
        assert_eq!(report.cnt_rows_written, 2);
        assert_eq!(
            read_values(&request.path_file_out),
            vec![
                derive_strings(&["", "Status", "Overall Result"]),
                derive_strings(&["t1", "ok", C_VERDICT_PASSED]),
            ]
        );
    }

    #[test]
    fn test_malformed_report_keeps_earlier_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_report(dir.path(), "a.html", &derive_report_html(&[&["t1", "ok"]], C_VERDICT_PASSED));
        write_report(dir.path(), "b.html", &derive_report_html(&[], C_VERDICT_PASSED));
        let request = derive_request(dir.path());

        let (res, l_events) = run_collect(&derive_runner(), &request);
        assert!(matches!(res, Err(RunError::MalformedReport { ref file, .. }) if file == "b.html"));
        assert_eq!(read_values(&request.path_file_out).len(), 2);

        let l_progress: Vec<usize> = l_events
            .iter()
            .filter_map(|event| match event {
                EnumRunEvent::Progress(progress) => Some(progress.processed_count),
                _ => None,
            })
            .collect();
        assert_eq!(l_progress, vec![1]);
        match l_events.last() {
            Some(EnumRunEvent::Failed(failure)) => {
                assert_eq!(failure.kind, EnumRunFailureKind::InvalidReport)
            }
            other => panic!("unexpected last event: {other:?}"),
        }
    }

    #[test]
    fn test_report_without_table_is_missing_table() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_report(dir.path(), "a.html", "<html><body>no results</body></html>");
        let request = derive_request(dir.path());

        let (res, _) = run_collect(&derive_runner(), &request);
        assert!(matches!(res, Err(RunError::MissingTable { .. })));
    }

    #[test]
    fn test_rerun_replaces_output_with_identical_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_report(dir.path(), "a.html", &derive_report_html(&[&["t1", "ok"]], C_VERDICT_PASSED));
        write_report(dir.path(), "b.html", &derive_report_html(&[&["t2", "bad"]], C_VERDICT_FAILED));
        let request = derive_request(dir.path());
        let runner = derive_runner();

        runner.run(&request, &mut |_| {}).expect("first run");
        let l_rows_first = read_values(&request.path_file_out);
        runner.run(&request, &mut |_| {}).expect("second run");
        assert_eq!(read_values(&request.path_file_out), l_rows_first);
        assert_eq!(l_rows_first.len(), 3);
    }

    #[test]
    fn test_highlight_pass_counts_every_exact_verdict_cell() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_report(dir.path(), "a.html", &derive_report_html(&[&["t1", "ok"]], C_VERDICT_PASSED));
        write_report(
            dir.path(),
            "b.html",
            &derive_report_html(&[&[C_VERDICT_FAILED, "ok"]], C_VERDICT_FAILED),
        );
        write_report(
            dir.path(),
            "c.html",
            &derive_report_html(&[&["t3", "test result : passed"]], "Test Result: PASSED"),
        );
        let request = derive_request(dir.path());

        let report = derive_runner().run(&request, &mut |_| {}).expect("run");
        assert_eq!(report.cnt_cells_highlighted, 3);
        assert_eq!(report.cnt_passed(), 1);
        assert_eq!(report.cnt_failed(), 1);
    }

    #[test]
    fn test_spawned_run_streams_monotonic_progress() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["a.html", "b.html", "c.html"] {
            write_report(dir.path(), name, &derive_report_html(&[&["t", "ok"]], C_VERDICT_PASSED));
        }
        let request = derive_request(dir.path());

        let handle = spawn_batch_run(derive_runner(), request);
        let l_events: Vec<EnumRunEvent> = handle.events().iter().collect();
        let report = handle.wait().expect("run");

        let l_percent: Vec<u8> = l_events
            .iter()
            .filter_map(|event| match event {
                EnumRunEvent::Progress(progress) => Some(progress.percent()),
                _ => None,
            })
            .collect();
        assert_eq!(l_percent, vec![33, 66, 100]);
        assert_eq!(l_events.first(), Some(&EnumRunEvent::Started { total_count: 3 }));
        assert_eq!(l_events.last(), Some(&EnumRunEvent::Completed(report)));
    }
}
