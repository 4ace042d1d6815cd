//! `midp-recon`: normalization and reconciliation engine for monthly
//! document-register exports.
//!
//! Pure engine crate: receives pre-loaded tables, returns an annotated
//! report. No filesystem access.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod schema;
pub mod snapshot;
pub mod summary;
pub mod table;

pub use classify::{classify_cell, classify_values};
pub use config::{MergePolicy, ReconConfig};
pub use engine::{reconcile_and_classify, run, validate_inputs};
pub use error::{ReconError, Side};
pub use mapping::{ColumnMapping, ColumnSpec};
pub use model::{DiffTag, ReconReport, ReportRow, RowStatus, TaggedCell};
pub use normalize::normalize;
pub use snapshot::Snapshot;
pub use table::Table;
