use rayon::prelude::*;
use tracing::trace;

use crate::schema::Column;
use crate::table::{Record, RecordStore};
use super::sort::{sort_rows, PARALLEL_THRESHOLD};
use super::state::{FilterColumn, QueryState};

/// Filtered and sorted positions into the working dataset.
///
/// A view is never edited in place; it is re-derived from the working
/// dataset and query state whenever either changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct View {
    rows: Vec<usize>,
    total_records: usize,
}

impl View {
    /// Positions into the working dataset, in display order
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Number of records that survived filtering
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Size of the working dataset the view was derived from
    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn records<'a>(&'a self, store: &'a RecordStore) -> impl Iterator<Item = &'a Record> + 'a {
        let working = store.working();
        self.rows.iter().filter_map(move |&pos| working.get(pos))
    }
}

/// Derive the view for `query` over `working`.
///
/// 1. no search term: every record passes and the filter column is ignored
/// 2. search term with `FilterColumn::All`: any column may contain the term
/// 3. search term with a single column: only that column is matched, scanning
///    the whole working dataset rather than narrowing step 2's result
/// 4. optional stable sort on the surviving rows
pub fn derive_view(working: &[Record], query: &QueryState) -> View {
    let needle = query.search_term.to_lowercase();

    let rows = if needle.is_empty() {
        (0..working.len()).collect()
    } else {
        match query.filter_column {
            FilterColumn::All => matching_rows(working, |r| {
                Column::ALL.iter().any(|&col| contains_ci(r.get(col), &needle))
            }),
            FilterColumn::Only(col) => matching_rows(working, |r| contains_ci(r.get(col), &needle)),
        }
    };

    let rows = match query.sort_column {
        Some(col) => sort_rows(working, rows, col, query.sort_direction),
        None => rows,
    };

    trace!(
        total = working.len(),
        visible = rows.len(),
        search = %query.search_term,
        filter = %query.filter_column,
        "View derived"
    );

    View {
        rows,
        total_records: working.len(),
    }
}

fn matching_rows<F>(working: &[Record], pred: F) -> Vec<usize>
where
    F: Fn(&Record) -> bool + Sync,
{
    if working.len() >= PARALLEL_THRESHOLD {
        working
            .par_iter()
            .enumerate()
            .filter(|&(_, r)| pred(r))
            .map(|(pos, _)| pos)
            .collect()
    } else {
        working
            .iter()
            .enumerate()
            .filter(|&(_, r)| pred(r))
            .map(|(pos, _)| pos)
            .collect()
    }
}

/// `needle` must already be lowercase
fn contains_ci(value: &str, needle: &str) -> bool {
    value.to_lowercase().contains(needle)
}
