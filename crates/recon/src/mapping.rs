use serde::{Deserialize, Serialize};

/// Built-in register schema: canonical column -> raw export column.
/// An empty raw name means the column has no source and is emitted blank.
const MIDP_COLUMNS: &[(&str, &str)] = &[
    ("Information Container", "Information Container"),
    ("Information Container Title / Description", "Information Container Title"),
    ("ID number", "P6 Activity ID (Please Review)"),
    ("Project Milestone", "LWR - Phase"),
    ("Comment", "Comments"),
    ("ID", ""),
    ("LOA", ""),
    ("Status Code", "⚡ Document Status"),
    ("Revision", "⚡ Last Published Revision"),
    ("Issue Date (Planned)", "Planned Issue Date"),
    ("Issue Date (Actual)", "⚡ Published Date"),
    ("Authorised by TW Service manager", ""),
    ("Created by", "Document Workstream (Owning team)"),
    ("Y/N", "DCO Submission Document"),
    ("Y/N.", ""),
    ("File Extension", "Source File Extension (Please Review)"),
    ("Security Reference", "Security Reference"),
    ("Project", "Project"),
    ("Functional Breakdown", "Functional Breakdown"),
    ("Spatial Breakdown", "Spatial Breakdown"),
    ("Document Type", "Document Type"),
    ("Discipline", "Discipline"),
];

/// One canonical column and the raw export column it is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub canonical: String,
    #[serde(default)]
    pub raw: String,
}

impl ColumnSpec {
    pub fn new(canonical: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            raw: raw.into(),
        }
    }

    /// The raw source column, or `None` for an always-blank column.
    pub fn source(&self) -> Option<&str> {
        if self.raw.is_empty() {
            None
        } else {
            Some(&self.raw)
        }
    }
}

/// Ordered canonical -> raw column table. Declaration order is the output
/// column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    columns: Vec<ColumnSpec>,
}

impl ColumnMapping {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// The fixed document-register mapping.
    pub fn midp() -> Self {
        Self::new(
            MIDP_COLUMNS
                .iter()
                .map(|(canonical, raw)| ColumnSpec::new(*canonical, *raw))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnSpec> {
        self.columns.iter()
    }

    /// Canonical names in output order.
    pub fn canonical_columns(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.canonical.as_str()).collect()
    }

    /// Columns last month's register must carry: every canonical name.
    pub fn required_last(&self) -> Vec<&str> {
        self.canonical_columns()
    }

    /// Columns this month's export must carry: every non-empty raw name.
    pub fn required_current(&self) -> Vec<&str> {
        self.columns.iter().filter_map(|c| c.source()).collect()
    }

    pub fn contains_canonical(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.canonical == name)
    }

    /// True if `name` is the raw source of some canonical column (and so is
    /// renamed away during normalization).
    pub fn is_raw_source(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.source() == Some(name))
    }

    pub fn raw_for(&self, canonical: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.canonical == canonical)
            .and_then(|c| c.source())
    }

    pub fn canonical_for_raw(&self, raw: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.source() == Some(raw))
            .map(|c| c.canonical.as_str())
    }
}

impl<'a> IntoIterator for &'a ColumnMapping {
    type Item = &'a ColumnSpec;
    type IntoIter = std::slice::Iter<'a, ColumnSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midp_table_shape() {
        let mapping = ColumnMapping::midp();
        assert_eq!(mapping.len(), 22);
        assert_eq!(mapping.canonical_columns()[0], "Information Container");
        assert_eq!(mapping.canonical_columns()[21], "Discipline");
        // four canonical columns have no raw source
        assert_eq!(mapping.required_current().len(), 18);
        assert_eq!(mapping.required_last().len(), 22);
    }

    #[test]
    fn blank_sources_are_not_required() {
        let mapping = ColumnMapping::midp();
        let required = mapping.required_current();
        assert!(!required.contains(&""));
        assert_eq!(mapping.raw_for("LOA"), None);
        assert_eq!(mapping.raw_for("Comment"), Some("Comments"));
    }

    #[test]
    fn reverse_lookup() {
        let mapping = ColumnMapping::midp();
        assert_eq!(mapping.canonical_for_raw("DCO Submission Document"), Some("Y/N"));
        assert_eq!(mapping.canonical_for_raw("Publish Row to TW"), None);
        assert!(mapping.is_raw_source("Comments"));
        assert!(!mapping.is_raw_source("Comment"));
    }

    #[test]
    fn required_current_keeps_declaration_order() {
        let mapping = ColumnMapping::new(vec![
            ColumnSpec::new("B", "raw_b"),
            ColumnSpec::new("Blank", ""),
            ColumnSpec::new("A", "raw_a"),
        ]);
        assert_eq!(mapping.required_current(), vec!["raw_b", "raw_a"]);
    }
}
