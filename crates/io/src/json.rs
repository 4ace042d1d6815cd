// JSON export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use midp_recon::ReconReport;

/// Write the full report (meta, columns, rows, deleted, summary) as pretty JSON.
pub fn write_report<W: Write>(report: &ReconReport, out: W) -> Result<(), String> {
    serde_json::to_writer_pretty(out, report).map_err(|e| e.to_string())
}

pub fn export_report(report: &ReconReport, path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_report(report, &mut writer)?;
    writer.write_all(b"\n").map_err(|e| e.to_string())?;
    writer.flush().map_err(|e| e.to_string())
}
