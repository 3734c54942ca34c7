use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::schema::{Column, COLUMN_COUNT};
use super::diff;
use super::record::{Record, RecordId};

/// Baseline and working copies of the dataset.
///
/// Both vectors always hold the same ids in the same order; edits only ever
/// change field values of the working copy. `modified_count` is maintained
/// on every write so it never has to rescan.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    original: Vec<Record>,
    working: Vec<Record>,
    /// id -> position in both vectors
    index: HashMap<RecordId, usize>,
    modified_count: usize,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both datasets with `rows`, assigning ids 1..=n in input order.
    /// An empty input is rejected and leaves the store as it was.
    pub fn load(&mut self, rows: Vec<[String; COLUMN_COUNT]>) -> Result<()> {
        if rows.is_empty() {
            return Err(Error::EmptyImport);
        }

        let original: Vec<Record> = rows
            .into_iter()
            .zip(1..)
            .map(|(fields, id)| Record::new(id, fields))
            .collect();
        let index = original
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.id, pos))
            .collect();

        self.working = original.clone();
        self.original = original;
        self.index = index;
        self.modified_count = 0;

        info!(records = self.working.len(), "Dataset loaded");
        Ok(())
    }

    /// Set one cell of a working record and refresh its modified flag
    pub fn edit_cell(&mut self, id: RecordId, column: Column, value: String) -> Result<()> {
        let pos = self.position(id)?;
        let working = &mut self.working[pos];
        let original = &self.original[pos];

        working.set(column, value);

        let was_modified = working.modified;
        working.modified = diff::is_modified(original, working);

        match (was_modified, working.modified) {
            (false, true) => self.modified_count += 1,
            (true, false) => self.modified_count -= 1,
            _ => {}
        }

        debug!(id, column = %column, modified = working.modified, "Cell edited");
        Ok(())
    }

    /// Restore every working record to its original values.
    /// Returns the number of records that were reverted.
    pub fn reset_all(&mut self) -> usize {
        if self.modified_count == 0 {
            return 0;
        }

        let mut reverted = 0;
        for (working, original) in self.working.iter_mut().zip(&self.original) {
            if working.modified {
                working.clone_from(original);
                reverted += 1;
            }
        }
        self.modified_count = 0;

        info!(reverted, "All edits reset");
        reverted
    }

    pub fn modified_count(&self) -> usize {
        self.modified_count
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    /// Working dataset in import order
    pub fn working(&self) -> &[Record] {
        &self.working
    }

    /// Baseline dataset in import order
    pub fn original(&self) -> &[Record] {
        &self.original
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.index.get(&id).map(|&pos| &self.working[pos])
    }

    pub fn get_original(&self, id: RecordId) -> Option<&Record> {
        self.index.get(&id).map(|&pos| &self.original[pos])
    }

    pub fn is_modified(&self, id: RecordId) -> Result<bool> {
        let pos = self.position(id)?;
        Ok(self.working[pos].modified)
    }

    /// Per-cell highlight predicate, recomputed on every call
    pub fn cell_changed(&self, id: RecordId, column: Column) -> Result<bool> {
        let pos = self.position(id)?;
        Ok(diff::cell_changed(&self.original[pos], &self.working[pos], column))
    }

    /// Columns of record `id` that differ from the original, in schema order
    pub fn changed_columns(&self, id: RecordId) -> Result<Vec<Column>> {
        let pos = self.position(id)?;
        Ok(diff::changed_columns(&self.original[pos], &self.working[pos]))
    }

    fn position(&self, id: RecordId) -> Result<usize> {
        self.index.get(&id).copied().ok_or(Error::NotFound(id))
    }
}
