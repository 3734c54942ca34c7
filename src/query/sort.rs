//! Ordering stage of the query pipeline

use std::cell::RefCell;
use std::cmp::Ordering;

use feruca::{Collator, Locale, Tailoring};
use rayon::prelude::*;

use crate::schema::Column;
use crate::table::Record;
use crate::util::parse_leading_int;
use super::state::SortDirection;

/// Threshold for using parallel processing
pub(crate) const PARALLEL_THRESHOLD: usize = 10_000;

thread_local! {
    // Root locale with punctuation kept significant, so "~x" sorts before letters
    static COLLATOR: RefCell<Collator> =
        RefCell::new(Collator::new(Tailoring::Cldr(Locale::Root), false, true));
}

/// Locale-aware ordering of two already lowercased strings
pub(crate) fn collate(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|c| c.borrow_mut().collate(a, b))
}

/// Reorder `rows` (positions into `records`) by `column`.
///
/// Keys are extracted once, then sorted with the position inside `rows` as
/// the final tie-breaker, so equal keys keep their incoming relative order in
/// either direction. Descending flips the comparator, not the output.
pub fn sort_rows(
    records: &[Record],
    rows: Vec<usize>,
    column: Column,
    direction: SortDirection,
) -> Vec<usize> {
    let use_parallel = rows.len() >= PARALLEL_THRESHOLD;

    if column.is_numeric() {
        let key = |row: usize| parse_leading_int(records[row].get(column));
        let mut keyed: Vec<(usize, usize, i64)> = if use_parallel {
            rows.into_par_iter()
                .enumerate()
                .map(|(seq, row)| (seq, row, key(row)))
                .collect()
        } else {
            rows.into_iter()
                .enumerate()
                .map(|(seq, row)| (seq, row, key(row)))
                .collect()
        };

        let cmp_fn = |a: &(usize, usize, i64), b: &(usize, usize, i64)| -> Ordering {
            let base = a.2.cmp(&b.2);
            match direction {
                SortDirection::Ascending => base.then(a.0.cmp(&b.0)),
                SortDirection::Descending => base.reverse().then(a.0.cmp(&b.0)),
            }
        };

        if use_parallel {
            keyed.par_sort_unstable_by(cmp_fn);
        } else {
            keyed.sort_unstable_by(cmp_fn);
        }

        keyed.into_iter().map(|(_, row, _)| row).collect()
    } else {
        let key = |row: usize| records[row].get(column).to_lowercase();
        let mut keyed: Vec<(usize, usize, String)> = if use_parallel {
            rows.into_par_iter()
                .enumerate()
                .map(|(seq, row)| (seq, row, key(row)))
                .collect()
        } else {
            rows.into_iter()
                .enumerate()
                .map(|(seq, row)| (seq, row, key(row)))
                .collect()
        };

        let cmp_fn = |a: &(usize, usize, String), b: &(usize, usize, String)| -> Ordering {
            let base = collate(&a.2, &b.2);
            match direction {
                SortDirection::Ascending => base.then(a.0.cmp(&b.0)),
                SortDirection::Descending => base.reverse().then(a.0.cmp(&b.0)),
            }
        };

        if use_parallel {
            keyed.par_sort_unstable_by(cmp_fn);
        } else {
            keyed.sort_unstable_by(cmp_fn);
        }

        keyed.into_iter().map(|(_, row, _)| row).collect()
    }
}
