use log::debug;

use crate::config::ReconConfig;
use crate::error::{ReconError, Side};
use crate::mapping::ColumnMapping;
use crate::schema::require_columns;
use crate::table::Table;

/// Rewrite this month's raw export into the canonical schema.
///
/// Rows whose publish column is not exactly the publish literal are dropped
/// before anything else. The flag column is derived from its sentinel, mapped
/// columns are renamed, unmapped columns dropped, absent canonical columns
/// filled with `""`, and the result is laid out in canonical order.
pub fn normalize(raw: &Table, config: &ReconConfig) -> Result<Table, ReconError> {
    require_columns(raw, &config.required_current(), Side::Current)?;

    let publish_col = raw.column_index(&config.publish.column).ok_or_else(|| ReconError::Schema {
        side: Side::Current,
        missing: vec![config.publish.column.clone()],
    })?;
    let flag_col = raw.column_index(&config.flag.column);
    let sources = resolve_sources(raw, &config.columns);

    let canonical: Vec<String> = config
        .columns
        .canonical_columns()
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut out = Table::new(canonical);
    let mut excluded = 0usize;

    for row in raw.rows() {
        if !config.publish.accepts(&row[publish_col]) {
            excluded += 1;
            continue;
        }
        let record = sources
            .iter()
            .map(|source| match *source {
                Some(idx) if Some(idx) == flag_col => config.flag.derive(&row[idx]).to_string(),
                Some(idx) => row[idx].clone(),
                None => String::new(),
            })
            .collect();
        out.push_row(record)?;
    }

    debug!(
        "normalize: {} of {} raw rows published, {} excluded",
        out.len(),
        raw.len(),
        excluded
    );
    Ok(out)
}

/// For each canonical column, the raw column index it is read from.
///
/// A mapped column reads its raw source. An unmapped column still picks up a
/// raw column that already carries the canonical name, unless that raw column
/// is itself renamed to something else.
fn resolve_sources(raw: &Table, mapping: &ColumnMapping) -> Vec<Option<usize>> {
    mapping
        .iter()
        .map(|spec| match spec.source() {
            Some(source) => raw.column_index(source),
            None if !mapping.is_raw_source(&spec.canonical) => raw.column_index(&spec.canonical),
            None => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::ColumnSpec;

    fn config() -> ReconConfig {
        ReconConfig {
            key_column: "Doc".into(),
            columns: ColumnMapping::new(vec![
                ColumnSpec::new("Doc", "Document Number"),
                ColumnSpec::new("Note", "Notes"),
                ColumnSpec::new("Y/N", "DCO Submission Document"),
                ColumnSpec::new("Owner", ""),
            ]),
            ..ReconConfig::midp()
        }
    }

    fn raw(csv: &str) -> Table {
        Table::from_csv_str(csv).unwrap()
    }

    #[test]
    fn output_is_canonical_in_order() {
        let t = raw("Notes,Extra,Publish Row to TW,DCO Submission Document,Document Number\n\
                     hello,junk,TRUE,TRUE,D1\n");
        let out = normalize(&t, &config()).unwrap();
        assert_eq!(out.columns(), &["Doc", "Note", "Y/N", "Owner"]);
        assert_eq!(out.rows()[0], vec!["D1", "hello", "Y", ""]);
    }

    #[test]
    fn unpublished_rows_are_excluded() {
        let t = raw("Document Number,Notes,DCO Submission Document,Publish Row to TW\n\
                     D1,a,TRUE,TRUE\n\
                     D2,b,TRUE,FALSE\n\
                     D3,c,TRUE,\n\
                     D4,d,TRUE,true\n");
        let out = normalize(&t, &config()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.cell(0, 0), "D1");
    }

    #[test]
    fn flag_column_derivation() {
        let t = raw("Document Number,Notes,DCO Submission Document,Publish Row to TW\n\
                     D1,,TRUE,TRUE\n\
                     D2,,FALSE,TRUE\n\
                     D3,,,TRUE\n\
                     D4,,Yes,TRUE\n");
        let out = normalize(&t, &config()).unwrap();
        let flags: Vec<&str> = (0..out.len()).map(|r| out.cell(r, 2)).collect();
        assert_eq!(flags, vec!["Y", "N", "N", "N"]);
    }

    #[test]
    fn missing_raw_columns_fail_before_transforming() {
        let t = raw("Document Number,Publish Row to TW\nD1,TRUE\n");
        match normalize(&t, &config()) {
            Err(ReconError::Schema { side, missing }) => {
                assert_eq!(side, Side::Current);
                assert_eq!(missing, vec!["Notes", "DCO Submission Document"]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn missing_publish_column_is_a_schema_error() {
        let t = raw("Document Number,Notes,DCO Submission Document\nD1,a,TRUE\n");
        let err = normalize(&t, &config()).unwrap_err();
        assert!(matches!(err, ReconError::Schema { ref missing, .. } if missing == &vec!["Publish Row to TW".to_string()]));
    }

    #[test]
    fn unmapped_column_keeps_same_named_raw_column() {
        let t = raw("Document Number,Notes,DCO Submission Document,Publish Row to TW,Owner\n\
                     D1,a,TRUE,TRUE,alice\n");
        let out = normalize(&t, &config()).unwrap();
        assert_eq!(out.value(0, "Owner"), Some("alice"));
    }

    #[test]
    fn raw_column_named_like_canonical_is_dropped_when_renamed_away() {
        // "Note" exists in the raw export but canonical "Note" reads "Notes".
        let t = raw("Document Number,Notes,Note,DCO Submission Document,Publish Row to TW\n\
                     D1,from notes,stale,TRUE,TRUE\n");
        let out = normalize(&t, &config()).unwrap();
        assert_eq!(out.value(0, "Note"), Some("from notes"));
    }

    #[test]
    fn short_raw_rows_become_blank_cells() {
        let t = raw("Publish Row to TW,Document Number,DCO Submission Document,Notes\nTRUE,D1\n");
        let out = normalize(&t, &config()).unwrap();
        assert_eq!(out.rows()[0], vec!["D1", "", "N", ""]);
    }

    #[test]
    fn empty_export_gives_empty_canonical_table() {
        let t = raw("Document Number,Notes,DCO Submission Document,Publish Row to TW\n");
        let out = normalize(&t, &config()).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.columns().len(), 4);
    }
}
