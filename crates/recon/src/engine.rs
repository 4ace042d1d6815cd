use log::{debug, info};

use crate::config::ReconConfig;
use crate::error::{ReconError, Side};
use crate::model::{ReconMeta, ReconReport};
use crate::normalize::normalize;
use crate::reconcile::align;
use crate::schema::require_columns;
use crate::snapshot::Snapshot;
use crate::summary::compute_summary;
use crate::table::Table;

/// Run the schema gate on both inputs: last month first, then this month.
pub fn validate_inputs(config: &ReconConfig, last: &Table, current: &Table) -> Result<(), ReconError> {
    require_columns(last, &config.required_last(), Side::Last)?;
    require_columns(current, &config.required_current(), Side::Current)?;
    Ok(())
}

/// Align last month's register with this month's normalized table and tag
/// every cell.
pub fn reconcile_and_classify(
    config: &ReconConfig,
    last: &Table,
    normalized: &Table,
) -> Result<ReconReport, ReconError> {
    require_columns(last, &config.required_last(), Side::Last)?;
    require_columns(normalized, &config.required_last(), Side::Current)?;

    let (old, new) = Snapshot::pair(last, normalized, &config.key_column)?;
    let columns = config.columns.canonical_columns();
    let alignment = align(&old, &new, &columns, config.merge);

    debug!(
        "reconcile: {} main rows, {} deleted rows",
        alignment.rows.len(),
        alignment.deleted.len()
    );

    let summary = compute_summary(&alignment.rows, &alignment.deleted, last.len(), normalized.len());

    Ok(ReconReport {
        meta: ReconMeta {
            config_name: config.name.clone(),
            key_column: config.key_column.clone(),
            merge: config.merge.to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        columns: columns.into_iter().map(str::to_string).collect(),
        rows: alignment.rows,
        deleted: alignment.deleted,
        summary,
    })
}

/// Full pipeline: validate, normalize this month's export, reconcile.
/// Aborts on the first error; no partial report is produced.
pub fn run(config: &ReconConfig, last: &Table, current: &Table) -> Result<ReconReport, ReconError> {
    validate_inputs(config, last, current)?;
    let normalized = normalize(current, config)?;
    let report = reconcile_and_classify(config, last, &normalized)?;

    let s = &report.summary;
    info!(
        "{}: {} shared ({} changed), {} added, {} deleted",
        config.name, s.shared, s.rows_with_changes, s.added, s.deleted
    );
    Ok(report)
}
