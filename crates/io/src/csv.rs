// CSV import/export

use std::io::{Read, Write};
use std::path::Path;

use midp_recon::{ReconReport, Table};

/// Header of the extra column carrying each row's membership.
pub const ROW_STATUS_HEADER: &str = "Row Status";

/// Read a CSV file into a text-only table. Every cell stays a string and
/// headers are kept exactly as written.
pub fn read_table(path: &Path) -> Result<Table, String> {
    let content = read_file_as_utf8(path)?;
    Table::from_csv_str(&content).map_err(|e| format!("{}: {e}", path.display()))
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
/// A leading byte-order mark is dropped so it never sticks to the first header.
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("{}: {e}", path.display()))?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            log::warn!("{}: not valid UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Write a table (e.g. the normalized export) as CSV.
pub fn write_table<W: Write>(table: &Table, out: W) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(table.columns()).map_err(|e| e.to_string())?;
    for row in table.rows() {
        writer.write_record(row).map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())
}

pub fn export_table(table: &Table, path: &Path) -> Result<(), String> {
    let file = std::fs::File::create(path).map_err(|e| format!("{}: {e}", path.display()))?;
    write_table(table, file)
}

/// Write the report as CSV: the key column, the other canonical columns,
/// then `Row Status`.
/// Main rows come first, then the deleted block.
pub fn write_report<W: Write>(report: &ReconReport, out: W) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(out);

    let order = report.display_order();
    let mut header: Vec<&str> = order.iter().map(|&i| report.columns[i].as_str()).collect();
    header.push(ROW_STATUS_HEADER);
    writer.write_record(&header).map_err(|e| e.to_string())?;

    for row in report.iter_rows() {
        let mut record: Vec<&str> = order
            .iter()
            .map(|&i| row.cells.get(i).map_or("", |c| c.value.as_str()))
            .collect();
        record.push(row.status.as_str());
        writer.write_record(&record).map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())
}

pub fn export_report(report: &ReconReport, path: &Path) -> Result<(), String> {
    let file = std::fs::File::create(path).map_err(|e| format!("{}: {e}", path.display()))?;
    write_report(report, file)
}
