//! Merge report records into one sheet, header first and once.

use reportsheet_io_xlsx::{SheetStore, SheetStoreError, SpecCellFormat};
use tracing::debug;

use crate::spec::SpecReportRecord;

/// Sequences records of one run into the sheet store.
#[derive(Debug)]
pub struct ResultAggregator<'a> {
    store: &'a mut SheetStore,
    fmt_header: &'a SpecCellFormat,
    fmt_data: &'a SpecCellFormat,
    if_first: bool,
}

impl<'a> ResultAggregator<'a> {
    pub fn new(
        store: &'a mut SheetStore,
        fmt_header: &'a SpecCellFormat,
        fmt_data: &'a SpecCellFormat,
    ) -> Self {
        Self {
            store,
            fmt_header,
            fmt_data,
            if_first: true,
        }
    }

    /// `true` until the first record was merged; the extractor should capture
    /// headers only then.
    pub fn if_awaiting_header(&self) -> bool {
        self.if_first
    }

    /// Write the record: its header row when it is the first record, then its
    /// data rows. Returns the number of rows written.
    pub fn merge(&mut self, record: SpecReportRecord) -> Result<usize, SheetStoreError> {
        let mut cnt_rows = 0;
        if self.if_first
            && let Some(headers) = record.headers
        {
            cnt_rows += self.store.append(&[headers], self.fmt_header)?.cnt_rows;
        }
        self.if_first = false;

        let report = self.store.append(&record.data_rows, self.fmt_data)?;
        cnt_rows += report.cnt_rows;
        debug!(
            row_start = report.row_start,
            cnt_rows,
            verdict = %record.verdict,
            "merged report record"
        );
        Ok(cnt_rows)
    }
}
