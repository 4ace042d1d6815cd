// Key-based alignment of last month's register against this month's
// normalized export. Pure: two snapshots in, tagged rows out.

use crate::classify::{classify_row, classify_values};
use crate::config::MergePolicy;
use crate::model::{DiffTag, ReportRow, RowStatus, TaggedCell};
use crate::snapshot::Snapshot;

#[derive(Debug, Clone)]
pub struct Alignment {
    /// Shared and added rows, in this month's order.
    pub rows: Vec<ReportRow>,
    /// Rows only last month has, in last month's order.
    pub deleted: Vec<ReportRow>,
}

/// Align `old` and `new` by key over `columns`.
///
/// Shared and added rows take this month's values. Under
/// `MergePolicy::PreferNew` a blank shared cell falls back to last month's
/// value. Tags always come from the two raw source values, never the merged
/// one. Deleted rows carry last month's values and are tagged `deleted`
/// throughout.
pub fn align(old: &Snapshot<'_>, new: &Snapshot<'_>, columns: &[&str], merge: MergePolicy) -> Alignment {
    let old_cols: Vec<Option<usize>> = columns.iter().map(|c| old.table().column_index(c)).collect();
    let new_cols: Vec<Option<usize>> = columns.iter().map(|c| new.table().column_index(c)).collect();

    let mut rows = Vec::with_capacity(new.len());
    for key in new.keys() {
        let new_row = new.row(key);
        let old_row = old.row(key);
        let Some(status) = classify_row(key, old, new) else {
            continue;
        };

        let cells = (0..columns.len())
            .map(|i| {
                let new_val = pick(new_row, new_cols[i]);
                let old_val = pick(old_row, old_cols[i]);
                let tag = classify_values(old_val, new_val);
                let value = match (merge, new_val, old_val) {
                    (MergePolicy::PreferNew, Some(""), Some(fallback)) => fallback,
                    (_, Some(v), _) => v,
                    (_, None, _) => "",
                };
                TaggedCell {
                    value: value.to_string(),
                    tag,
                }
            })
            .collect();

        rows.push(ReportRow {
            key: key.to_string(),
            status,
            cells,
        });
    }

    let deleted = old
        .keys()
        .filter(|key| !new.contains(key))
        .map(|key| {
            let old_row = old.row(key);
            ReportRow {
                key: key.to_string(),
                status: RowStatus::Deleted,
                cells: old_cols
                    .iter()
                    .map(|col| TaggedCell {
                        value: pick(old_row, *col).unwrap_or("").to_string(),
                        tag: DiffTag::Deleted,
                    })
                    .collect(),
            }
        })
        .collect();

    Alignment { rows, deleted }
}

/// Cell of an optional row. A present row lacking the column reads as `""`.
fn pick<'a>(row: Option<&'a [String]>, col: Option<usize>) -> Option<&'a str> {
    row.map(|r| col.map(|c| r[c].as_str()).unwrap_or(""))
}
