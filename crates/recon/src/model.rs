use serde::Serialize;

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Per-cell classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffTag {
    Unchanged,
    Modified,
    Added,
    Deleted,
    NoSignal,
}

impl DiffTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffTag::Unchanged => "unchanged",
            DiffTag::Modified => "modified",
            DiffTag::Added => "added",
            DiffTag::Deleted => "deleted",
            DiffTag::NoSignal => "no-signal",
        }
    }

    /// True for tags a reviewer needs to look at.
    pub fn is_change(&self) -> bool {
        matches!(self, DiffTag::Modified | DiffTag::Added | DiffTag::Deleted)
    }
}

impl std::fmt::Display for DiffTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which snapshots a key appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// In both last month and this month.
    Shared,
    /// Only this month.
    Added,
    /// Only last month.
    Deleted,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Shared => "shared",
            RowStatus::Added => "added",
            RowStatus::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedCell {
    pub value: String,
    pub tag: DiffTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub key: String,
    pub status: RowStatus,
    /// One cell per canonical column, in canonical order.
    pub cells: Vec<TaggedCell>,
}

impl ReportRow {
    pub fn has_changes(&self) -> bool {
        self.cells.iter().any(|c| c.tag.is_change())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagCounts {
    pub unchanged: usize,
    pub modified: usize,
    pub added: usize,
    pub deleted: usize,
    pub no_signal: usize,
}

impl TagCounts {
    pub fn record(&mut self, tag: DiffTag) {
        match tag {
            DiffTag::Unchanged => self.unchanged += 1,
            DiffTag::Modified => self.modified += 1,
            DiffTag::Added => self.added += 1,
            DiffTag::Deleted => self.deleted += 1,
            DiffTag::NoSignal => self.no_signal += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub rows_last: usize,
    pub rows_current: usize,
    pub shared: usize,
    pub added: usize,
    pub deleted: usize,
    /// Shared rows with at least one changed cell.
    pub rows_with_changes: usize,
    pub cells: TagCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub key_column: String,
    pub merge: String,
    pub engine_version: String,
    pub run_at: String,
}

/// The annotated result of one reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    /// Canonical columns, in declared order.
    pub columns: Vec<String>,
    /// Shared and added rows, in this month's order.
    pub rows: Vec<ReportRow>,
    /// Rows present only last month, in last month's order.
    pub deleted: Vec<ReportRow>,
    pub summary: ReconSummary,
}

impl ReconReport {
    /// Main block followed by the deleted block.
    pub fn iter_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().chain(self.deleted.iter())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len() + self.deleted.len()
    }

    /// Look a key up in either block.
    pub fn find(&self, key: &str) -> Option<&ReportRow> {
        self.iter_rows().find(|r| r.key == key)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Column positions for rendering: the key column first, then the
    /// remaining canonical columns in declared order.
    pub fn display_order(&self) -> Vec<usize> {
        let key = self.column_index(&self.meta.key_column);
        key.into_iter()
            .chain((0..self.columns.len()).filter(|&i| Some(i) != key))
            .collect()
    }

    /// Cell at (`key`, `column`) in either block.
    pub fn cell(&self, key: &str, column: &str) -> Option<&TaggedCell> {
        let col = self.column_index(column)?;
        self.find(key).and_then(|r| r.cells.get(col))
    }
}
