// XLSX export of the annotated report.
//
// Cell fill encodes the diff tag: modified = yellow, added = lime,
// deleted = red. Unchanged and no-signal cells are left unstyled.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, Workbook, XlsxError};

use midp_recon::{DiffTag, ReconReport};

const SHEET_NAME: &str = "Sheet1";

const YELLOW: u32 = 0xFFFF00;
const LIME: u32 = 0x00FF00;
const RED: u32 = 0xFF0000;

/// Widest auto-fitted column, in characters. Long titles and comments are
/// clipped at this width so the rest of the row stays on screen.
const MAX_COLUMN_WIDTH: usize = 60;

/// Export statistics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub rows_exported: usize,
    pub cells_highlighted: usize,
}

/// Cell fill for a tag, if any.
pub fn tag_color(tag: DiffTag) -> Option<u32> {
    match tag {
        DiffTag::Modified => Some(YELLOW),
        DiffTag::Added => Some(LIME),
        DiffTag::Deleted => Some(RED),
        DiffTag::Unchanged | DiffTag::NoSignal => None,
    }
}

struct Formats {
    header: Format,
    plain: Format,
    modified: Format,
    added: Format,
    deleted: Format,
}

impl Formats {
    fn new() -> Self {
        let fill = |rgb: u32| Format::new().set_background_color(Color::RGB(rgb));
        Self {
            header: Format::new().set_bold(),
            plain: Format::new(),
            modified: fill(YELLOW),
            added: fill(LIME),
            deleted: fill(RED),
        }
    }

    fn for_tag(&self, tag: DiffTag) -> &Format {
        match tag {
            DiffTag::Modified => &self.modified,
            DiffTag::Added => &self.added,
            DiffTag::Deleted => &self.deleted,
            DiffTag::Unchanged | DiffTag::NoSignal => &self.plain,
        }
    }
}

/// Write the report to `path` as a single-sheet workbook with the header
/// row frozen. Main rows come first, then the deleted block.
pub fn export_report(report: &ReconReport, path: &Path) -> Result<ExportResult, String> {
    let mut workbook = Workbook::new();
    let result = write_sheet(&mut workbook, report)
        .map_err(|e| format!("Failed to write sheet: {}", e))?;

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;

    log::debug!(
        "xlsx: {} rows, {} highlighted cells -> {}",
        result.rows_exported,
        result.cells_highlighted,
        path.display()
    );
    Ok(result)
}

fn write_sheet(workbook: &mut Workbook, report: &ReconReport) -> Result<ExportResult, XlsxError> {
    let formats = Formats::new();
    let worksheet = workbook.add_worksheet().set_name(SHEET_NAME)?;
    let mut result = ExportResult::default();
    let order = report.display_order();
    let mut widths: Vec<usize> = order.iter().map(|&src| report.columns[src].chars().count()).collect();

    for (col, &src) in order.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, &report.columns[src], &formats.header)?;
    }

    for (i, row) in report.iter_rows().enumerate() {
        let row32 = (i + 1) as u32;
        for (col, &src) in order.iter().enumerate() {
            let Some(cell) = row.cells.get(src) else {
                continue;
            };
            if tag_color(cell.tag).is_some() {
                result.cells_highlighted += 1;
            }
            // Blank styled cells still need a fill, so write "" rather than skip.
            worksheet.write_string_with_format(row32, col as u16, &cell.value, formats.for_tag(cell.tag))?;
            widths[col] = widths[col].max(cell.value.chars().count());
        }
        result.rows_exported += 1;
    }

    for (col, width) in widths.iter().enumerate() {
        let width = (*width).clamp(8, MAX_COLUMN_WIDTH) as f64 + 2.0;
        worksheet.set_column_width(col as u16, width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    use calamine::{open_workbook, Data, Reader, Xlsx};
    use tempfile::tempdir;

    use midp_recon::{reconcile_and_classify, ColumnMapping, ColumnSpec, ReconConfig, Table};

    fn report_with(columns: Vec<ColumnSpec>, last: &str, current: &str) -> ReconReport {
        let config = ReconConfig {
            key_column: "key".into(),
            columns: ColumnMapping::new(columns),
            ..ReconConfig::midp()
        };
        let last = Table::from_csv_str(last).unwrap();
        let current = Table::from_csv_str(current).unwrap();
        reconcile_and_classify(&config, &last, &current).unwrap()
    }

    fn report() -> ReconReport {
        report_with(
            vec![ColumnSpec::new("key", "key"), ColumnSpec::new("note", "note")],
            "key,note\nA,old\nD,same\nC,gone\n",
            "key,note\nA,new\nD,same\nB,x\n",
        )
    }

    /// Same data, but the key is declared second.
    fn key_second_report() -> ReconReport {
        report_with(
            vec![ColumnSpec::new("note", "note"), ColumnSpec::new("key", "key")],
            "note,key\nold,A\nsame,D\ngone,C\n",
            "note,key\nnew,A\nsame,D\nx,B\n",
        )
    }

    fn text_at(path: &Path, r: u32, c: u32) -> String {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        match range.get_value((r, c)) {
            Some(Data::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    fn zip_text(path: &Path, name: &str) -> String {
        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut text = String::new();
        entry.read_to_string(&mut text).unwrap();
        text
    }

    fn section<'a>(xml: &'a str, name: &str) -> &'a str {
        let start = xml.find(&format!("<{name} ")).unwrap();
        let end = xml[start..].find(&format!("</{name}>")).unwrap();
        &xml[start..start + end]
    }

    /// The `<fill>` element applied to `cell_ref` (e.g. "B2"), read back from
    /// the saved workbook's sheet and style parts.
    fn fill_of(path: &Path, cell_ref: &str) -> String {
        let sheet = zip_text(path, "xl/worksheets/sheet1.xml");
        let start = sheet.find(&format!("<c r=\"{cell_ref}\"")).unwrap();
        let tag = &sheet[start..start + sheet[start..].find('>').unwrap()];
        let style: usize = tag
            .split(" s=\"")
            .nth(1)
            .map(|s| s.split('"').next().unwrap().parse().unwrap())
            .unwrap_or(0);

        let styles = zip_text(path, "xl/styles.xml");
        let xf = section(&styles, "cellXfs").split("<xf ").nth(style + 1).unwrap();
        let fill_id: usize = xf
            .split("fillId=\"")
            .nth(1)
            .unwrap()
            .split('"')
            .next()
            .unwrap()
            .parse()
            .unwrap();
        section(&styles, "fills").split("<fill>").nth(fill_id + 1).unwrap().to_string()
    }

    #[test]
    fn tag_colors() {
        assert_eq!(tag_color(DiffTag::Modified), Some(0xFFFF00));
        assert_eq!(tag_color(DiffTag::Added), Some(0x00FF00));
        assert_eq!(tag_color(DiffTag::Deleted), Some(0xFF0000));
        assert_eq!(tag_color(DiffTag::Unchanged), None);
        assert_eq!(tag_color(DiffTag::NoSignal), None);
    }

    #[test]
    fn export_writes_values_in_report_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let result = export_report(&report(), &path).unwrap();

        assert_eq!(result.rows_exported, 4);
        // A: note modified; B: both cells added; C: both cells deleted
        assert_eq!(result.cells_highlighted, 5);

        assert_eq!(text_at(&path, 0, 0), "key");
        assert_eq!(text_at(&path, 0, 1), "note");
        assert_eq!(text_at(&path, 1, 1), "new");
        assert_eq!(text_at(&path, 2, 0), "D");
        assert_eq!(text_at(&path, 3, 0), "B");
        assert_eq!(text_at(&path, 4, 0), "C");
        assert_eq!(text_at(&path, 4, 1), "gone");
    }

    #[test]
    fn key_column_is_written_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        export_report(&key_second_report(), &path).unwrap();

        assert_eq!(text_at(&path, 0, 0), "key");
        assert_eq!(text_at(&path, 0, 1), "note");
        assert_eq!(text_at(&path, 1, 0), "A");
        assert_eq!(text_at(&path, 1, 1), "new");
        assert_eq!(text_at(&path, 4, 0), "C");
        assert_eq!(text_at(&path, 4, 1), "gone");
    }

    #[test]
    fn cells_are_filled_by_tag() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        export_report(&report(), &path).unwrap();

        // rows: 2 = A (note modified), 3 = D (unchanged), 4 = B (added), 5 = C (deleted)
        assert!(fill_of(&path, "B2").contains("rgb=\"FFFFFF00\""));
        assert!(!fill_of(&path, "A2").contains("rgb="));
        assert!(!fill_of(&path, "B3").contains("rgb="));
        assert!(fill_of(&path, "A4").contains("rgb=\"FF00FF00\""));
        assert!(fill_of(&path, "B5").contains("rgb=\"FFFF0000\""));
    }
}
