use serde::Serialize;

use crate::error::ReconError;

/// A text-only table: a header plus rows of exactly `columns.len()` cells.
///
/// Cells are always `String`; a missing value is the empty string. There is
/// no null marker and no typed value, which the classifier relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from owned rows. Short rows are padded with `""`.
    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ReconError> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Parse CSV text with a header row. Headers are kept byte-exact and no
    /// cell is coerced (`"NA"`, `"null"` stay text).
    pub fn from_csv_str(input: &str) -> Result<Self, ReconError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| ReconError::Csv(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut table = Self::new(columns);
        for result in reader.records() {
            let record = result.map_err(|e| ReconError::Csv(e.to_string()))?;
            table.push_row(record.iter().map(str::to_string).collect())?;
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Append a row. Missing trailing cells become `""`; extra cells are an
    /// error.
    pub fn push_row(&mut self, mut row: Vec<String>) -> Result<(), ReconError> {
        let expected = self.columns.len();
        if row.len() > expected {
            return Err(ReconError::RowWidth {
                row: self.rows.len() + 1,
                expected,
                found: row.len(),
            });
        }
        row.resize(expected, String::new());
        self.rows.push(row);
        Ok(())
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        &self.rows[row][col]
    }

    /// Value at (`row`, column named `column`); `None` if the column is absent.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }
}
