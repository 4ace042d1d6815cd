use std::fmt;

use serde::Serialize;

/// Which of the two input snapshots an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Last month's canonical register.
    Last,
    /// This month's raw export (or its normalized form).
    Current,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Last => "last",
            Side::Current => "current",
        }
    }
}

/// A key value that occurs more than once within one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateKey {
    pub side: Side,
    pub key: String,
    pub count: usize,
}

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (duplicate column, unknown key column, etc.).
    ConfigValidation(String),
    /// Required columns absent from an input table. Raised before any
    /// transformation begins.
    Schema { side: Side, missing: Vec<String> },
    /// A key value repeats within a snapshot, so rows cannot be aligned.
    AmbiguousKey(Vec<DuplicateKey>),
    /// A data row has more fields than the header.
    RowWidth { row: usize, expected: usize, found: usize },
    /// Malformed CSV input.
    Csv(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Schema { side, missing } => {
                match side {
                    Side::Last => write!(
                        f,
                        "Last month's MIDP is missing the following required columns (keys):"
                    )?,
                    Side::Current => write!(
                        f,
                        "This month's MIDP export is missing the following required columns (values):"
                    )?,
                }
                for column in missing {
                    write!(f, "\n- {column}")?;
                }
                Ok(())
            }
            Self::AmbiguousKey(dups) => {
                write!(f, "duplicate keys found:")?;
                for dup in dups {
                    write!(f, "\n  {} key {:?} appears {} times", dup.side.as_str(), dup.key, dup.count)?;
                }
                Ok(())
            }
            Self::RowWidth { row, expected, found } => {
                write!(f, "row {row}: expected at most {expected} fields, found {found}")
            }
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_each_missing_column() {
        let err = ReconError::Schema {
            side: Side::Current,
            missing: vec!["Comments".into(), "Project".into()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("This month's MIDP export"));
        assert!(msg.contains("(values)"));
        assert!(msg.ends_with("\n- Comments\n- Project"));
    }

    #[test]
    fn ambiguous_key_names_side_and_count() {
        let err = ReconError::AmbiguousKey(vec![DuplicateKey {
            side: Side::Last,
            key: "DOC-001".into(),
            count: 2,
        }]);
        assert!(err.to_string().contains("last key \"DOC-001\" appears 2 times"));
    }
}
