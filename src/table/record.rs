use crate::schema::{Column, COLUMN_COUNT};

/// Identifier assigned at import time, starting at 1
pub type RecordId = u64;

/// One book row: a stable id plus one string per schema column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    fields: [String; COLUMN_COUNT],
    /// Cached result of diffing against the original record
    pub(crate) modified: bool,
}

impl Record {
    pub fn new(id: RecordId, fields: [String; COLUMN_COUNT]) -> Self {
        Self {
            id,
            fields,
            modified: false,
        }
    }

    /// Build a record from a positional row, padding missing fields with ""
    /// and ignoring anything past the last schema column
    pub fn from_row<I, S>(id: RecordId, row: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields: [String; COLUMN_COUNT] = Default::default();
        for (slot, value) in fields.iter_mut().zip(row) {
            *slot = value.into();
        }
        Self::new(id, fields)
    }

    pub fn get(&self, column: Column) -> &str {
        &self.fields[column.index()]
    }

    pub(crate) fn set(&mut self, column: Column, value: String) {
        self.fields[column.index()] = value;
    }

    pub fn fields(&self) -> &[String; COLUMN_COUNT] {
        &self.fields
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }
}
