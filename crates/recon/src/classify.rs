use crate::model::{DiffTag, RowStatus};
use crate::snapshot::Snapshot;

/// Classify one cell from its two source values.
///
/// `None` means the row does not exist on that side, which is different from
/// an empty cell (`Some("")`). When both rows exist:
///
/// | last     | current  | tag         |
/// |----------|----------|-------------|
/// | `x`      | `x`      | `unchanged` |
/// | `x`      | `y`      | `modified`  |
/// | empty    | `y`      | `added`     |
/// | `x`      | empty    | `deleted`   |
/// | empty    | empty    | `no-signal` |
///
/// A row present on one side only is `added` / `deleted` in every cell.
pub fn classify_values(old: Option<&str>, new: Option<&str>) -> DiffTag {
    match (old, new) {
        (Some(old), Some(new)) => match (old.is_empty(), new.is_empty()) {
            (false, false) if old == new => DiffTag::Unchanged,
            (false, false) => DiffTag::Modified,
            (true, false) => DiffTag::Added,
            (false, true) => DiffTag::Deleted,
            (true, true) => DiffTag::NoSignal,
        },
        (None, Some(_)) => DiffTag::Added,
        (Some(_), None) => DiffTag::Deleted,
        (None, None) => DiffTag::NoSignal,
    }
}

/// Classify the cell at (`key`, `column`) across the two snapshots.
pub fn classify_cell(key: &str, column: &str, old: &Snapshot<'_>, new: &Snapshot<'_>) -> DiffTag {
    classify_values(old.value(key, column), new.value(key, column))
}

/// Row membership of `key`. `None` if neither snapshot has it.
pub fn classify_row(key: &str, old: &Snapshot<'_>, new: &Snapshot<'_>) -> Option<RowStatus> {
    match (old.contains(key), new.contains(key)) {
        (true, true) => Some(RowStatus::Shared),
        (false, true) => Some(RowStatus::Added),
        (true, false) => Some(RowStatus::Deleted),
        (false, false) => None,
    }
}
