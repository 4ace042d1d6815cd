use crate::model::{ReconSummary, ReportRow, RowStatus, TagCounts};

/// Compute summary statistics from the two report blocks.
pub fn compute_summary(
    rows: &[ReportRow],
    deleted: &[ReportRow],
    rows_last: usize,
    rows_current: usize,
) -> ReconSummary {
    let mut cells = TagCounts::default();
    let mut shared = 0;
    let mut added = 0;
    let mut rows_with_changes = 0;

    for row in rows {
        match row.status {
            RowStatus::Shared => {
                shared += 1;
                if row.has_changes() {
                    rows_with_changes += 1;
                }
            }
            RowStatus::Added => added += 1,
            RowStatus::Deleted => {}
        }
        for cell in &row.cells {
            cells.record(cell.tag);
        }
    }
    for row in deleted {
        for cell in &row.cells {
            cells.record(cell.tag);
        }
    }

    ReconSummary {
        rows_last,
        rows_current,
        shared,
        added,
        deleted: deleted.len(),
        rows_with_changes,
        cells,
    }
}
