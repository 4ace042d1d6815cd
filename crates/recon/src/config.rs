use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::mapping::ColumnMapping;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Canonical column used to align the two snapshots.
    #[serde(default = "default_key_column")]
    pub key_column: String,
    #[serde(default)]
    pub merge: MergePolicy,
    #[serde(default)]
    pub publish: PublishFilter,
    #[serde(default)]
    pub flag: FlagConfig,
    #[serde(default = "ColumnMapping::midp")]
    pub columns: ColumnMapping,
}

fn default_name() -> String {
    "MIDP".into()
}

fn default_key_column() -> String {
    "Information Container".into()
}

// ---------------------------------------------------------------------------
// Merge policy
// ---------------------------------------------------------------------------

/// How the value of a shared row is chosen when this month's cell is blank.
///
/// Note that `PreferNew` can resurrect a value someone deliberately cleared
/// this month. The cell is still tagged `deleted`, so the reviewer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// This month's value, falling back to last month's when blank.
    PreferNew,
    /// This month's value verbatim.
    NewOnly,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self::PreferNew
    }
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreferNew => write!(f, "prefer_new"),
            Self::NewOnly => write!(f, "new_only"),
        }
    }
}

// ---------------------------------------------------------------------------
// Row filter + flag derivation
// ---------------------------------------------------------------------------

/// Only raw rows whose `column` equals `value` enter the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishFilter {
    pub column: String,
    #[serde(default = "default_true_literal")]
    pub value: String,
}

impl Default for PublishFilter {
    fn default() -> Self {
        Self {
            column: "Publish Row to TW".into(),
            value: default_true_literal(),
        }
    }
}

impl PublishFilter {
    pub fn accepts(&self, raw: &str) -> bool {
        raw == self.value
    }
}

/// Binary flag derived from a raw sentinel: `true_value` -> `yes`,
/// anything else (blank included) -> `no`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagConfig {
    /// Raw column holding the sentinel.
    pub column: String,
    #[serde(default = "default_true_literal")]
    pub true_value: String,
    #[serde(default = "default_yes")]
    pub yes: String,
    #[serde(default = "default_no")]
    pub no: String,
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self {
            column: "DCO Submission Document".into(),
            true_value: default_true_literal(),
            yes: default_yes(),
            no: default_no(),
        }
    }
}

impl FlagConfig {
    pub fn derive(&self, raw: &str) -> &str {
        if raw == self.true_value {
            &self.yes
        } else {
            &self.no
        }
    }
}

fn default_true_literal() -> String {
    "TRUE".into()
}

fn default_yes() -> String {
    "Y".into()
}

fn default_no() -> String {
    "N".into()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl Default for ReconConfig {
    fn default() -> Self {
        Self::midp()
    }
}

impl ReconConfig {
    /// The built-in document-register configuration.
    pub fn midp() -> Self {
        Self {
            name: default_name(),
            key_column: default_key_column(),
            merge: MergePolicy::default(),
            publish: PublishFilter::default(),
            flag: FlagConfig::default(),
            columns: ColumnMapping::midp(),
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ReconError> {
        toml::to_string(self).map_err(|e| ReconError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.columns.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one column mapping is required".into(),
            ));
        }

        let mut canonical = HashSet::new();
        let mut raw = HashSet::new();
        for spec in &self.columns {
            if spec.canonical.is_empty() {
                return Err(ReconError::ConfigValidation(
                    "canonical column name must not be empty".into(),
                ));
            }
            if !canonical.insert(spec.canonical.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "duplicate canonical column '{}'",
                    spec.canonical
                )));
            }
            if let Some(source) = spec.source() {
                if !raw.insert(source) {
                    return Err(ReconError::ConfigValidation(format!(
                        "raw column '{source}' is mapped more than once"
                    )));
                }
            }
        }

        if !self.columns.contains_canonical(&self.key_column) {
            return Err(ReconError::ConfigValidation(format!(
                "key column '{}' is not a canonical column",
                self.key_column
            )));
        }
        if self.columns.raw_for(&self.key_column).is_none() {
            return Err(ReconError::ConfigValidation(format!(
                "key column '{}' has no raw source",
                self.key_column
            )));
        }

        if self.publish.column.is_empty() {
            return Err(ReconError::ConfigValidation(
                "publish.column must not be empty".into(),
            ));
        }
        if self.flag.column.is_empty() {
            return Err(ReconError::ConfigValidation(
                "flag.column must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Columns last month's register must carry.
    pub fn required_last(&self) -> Vec<&str> {
        self.columns.required_last()
    }

    /// Columns this month's export must carry: every mapped raw column plus
    /// the publish filter column.
    pub fn required_current(&self) -> Vec<&str> {
        let mut required = self.columns.required_current();
        if !required.contains(&self.publish.column.as_str()) {
            required.push(&self.publish.column);
        }
        required
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
