//! Exact-value background highlighting over a whole sheet.

use tracing::debug;

use crate::spec::{SheetStoreError, SpecCellFormat, SpecHighlightReport, SpecValueHighlight};
use crate::store::SheetStore;

/// Recolor every cell whose text equals a rule's `match_value`.
///
/// Matching is exact and case-sensitive. Rules run in order, so a cell hit
/// by several rules ends with the last rule's fill. Only the background is
/// replaced; the rest of the cell format is kept. The store is persisted
/// once after all rules ran.
pub fn apply_highlights(
    store: &mut SheetStore,
    rules: &[SpecValueHighlight],
) -> Result<SpecHighlightReport, SheetStoreError> {
    let mut cnt_cells_by_rule = vec![0usize; rules.len()];

    for cell in store.cells_mut() {
        for (n_idx_rule, rule) in rules.iter().enumerate() {
            if cell.value.as_str() == Some(rule.match_value.as_str()) {
                cell.format = cell.format.with_(SpecCellFormat {
                    bg_color: Some(rule.fill.clone()),
                    ..Default::default()
                });
                cnt_cells_by_rule[n_idx_rule] += 1;
            }
        }
    }

    let report = SpecHighlightReport { cnt_cells_by_rule };
    if !rules.is_empty() {
        store.persist()?;
    }
    debug!(cnt_cells = report.cnt_cells_total(), "applied highlights");
    Ok(report)
}
