//! Column presence checks run before any transformation.

use std::collections::HashSet;

use crate::error::{ReconError, Side};
use crate::table::Table;

/// Required names absent from `table`, in the order they were required.
/// An empty result means the table is valid.
pub fn missing_columns(table: &Table, required: &[&str]) -> Vec<String> {
    let present: HashSet<&str> = table.columns().iter().map(String::as_str).collect();
    required
        .iter()
        .filter(|c| !present.contains(*c))
        .map(|c| c.to_string())
        .collect()
}

/// Fail with `ReconError::Schema` when any required column is missing.
pub fn require_columns(table: &Table, required: &[&str], side: Side) -> Result<(), ReconError> {
    let missing = missing_columns(table, required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ReconError::Schema { side, missing })
    }
}
