// File I/O operations

pub mod csv;
pub mod json;
pub mod xlsx;

pub use csv::{read_file_as_utf8, read_table};

/// Report file name used when no output path is given: `YYMMDD.xlsx`.
pub fn default_report_filename(date: chrono::NaiveDate) -> String {
    date.format("%y%m%d.xlsx").to_string()
}
