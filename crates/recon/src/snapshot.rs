use std::collections::HashMap;

use crate::error::{DuplicateKey, ReconError, Side};
use crate::table::Table;

/// A table indexed by its key column.
///
/// Keys must be unique: a repeated key makes alignment undefined, so
/// construction fails with `ReconError::AmbiguousKey` instead of guessing.
#[derive(Debug)]
pub struct Snapshot<'a> {
    table: &'a Table,
    side: Side,
    key_col: usize,
    index: HashMap<&'a str, usize>,
}

impl<'a> Snapshot<'a> {
    pub fn new(table: &'a Table, key_column: &str, side: Side) -> Result<Self, ReconError> {
        let key_col = table.column_index(key_column).ok_or_else(|| ReconError::Schema {
            side,
            missing: vec![key_column.to_string()],
        })?;

        let duplicates = find_duplicates(table, key_col, side);
        if !duplicates.is_empty() {
            return Err(ReconError::AmbiguousKey(duplicates));
        }

        let index = table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| (row[key_col].as_str(), i))
            .collect();

        Ok(Self {
            table,
            side,
            key_col,
            index,
        })
    }

    /// Index both snapshots, reporting duplicate keys from both sides at once.
    pub fn pair(
        last: &'a Table,
        current: &'a Table,
        key_column: &str,
    ) -> Result<(Self, Self), ReconError> {
        match (
            Self::new(last, key_column, Side::Last),
            Self::new(current, key_column, Side::Current),
        ) {
            (Ok(old), Ok(new)) => Ok((old, new)),
            (Err(ReconError::AmbiguousKey(mut a)), Err(ReconError::AmbiguousKey(b))) => {
                a.extend(b);
                Err(ReconError::AmbiguousKey(a))
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn key_col(&self) -> usize {
        self.key_col
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn row(&self, key: &str) -> Option<&'a [String]> {
        let table = self.table;
        self.index.get(key).map(|&i| table.rows()[i].as_slice())
    }

    /// Cell for (`key`, `column`). `None` when the row is absent; a row that
    /// exists but lacks the column reads as `""`.
    pub fn value(&self, key: &str, column: &str) -> Option<&'a str> {
        let row = self.row(key)?;
        Some(
            self.table
                .column_index(column)
                .map(|col| row[col].as_str())
                .unwrap_or(""),
        )
    }

    /// Keys in table order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        let key_col = self.key_col;
        self.table.rows().iter().map(move |row| row[key_col].as_str())
    }
}

fn find_duplicates(table: &Table, key_col: usize, side: Side) -> Vec<DuplicateKey> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in table.rows() {
        *counts.entry(row[key_col].as_str()).or_insert(0) += 1;
    }
    let mut out: Vec<DuplicateKey> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, count)| DuplicateKey {
            side,
            key: key.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| a.key.cmp(&b.key));
    out
}
