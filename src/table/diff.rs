//! Cell- and record-level comparison of a working record against its baseline

use crate::schema::Column;
use super::record::Record;

/// True iff any schema column differs between the two records
pub fn is_modified(original: &Record, working: &Record) -> bool {
    Column::ALL
        .iter()
        .any(|&col| cell_changed(original, working, col))
}

/// True iff this one cell differs (exact string comparison)
pub fn cell_changed(original: &Record, working: &Record, column: Column) -> bool {
    original.get(column) != working.get(column)
}

/// Columns whose working value differs from the original, in schema order
pub fn changed_columns(original: &Record, working: &Record) -> Vec<Column> {
    Column::ALL
        .into_iter()
        .filter(|&col| cell_changed(original, working, col))
        .collect()
}
