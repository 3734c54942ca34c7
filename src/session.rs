use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::fileio::{self, FileIO};
use crate::query::{derive_view, FilterColumn, Pager, QueryState, View};
use crate::sample;
use crate::schema::{Column, COLUMN_COUNT};
use crate::table::{Record, RecordId, RecordStore};

/// A session behind a single lock, for callers that mutate from more than
/// one thread. Load, edit and reset all go through the same mutex.
pub type SharedSession = Arc<Mutex<Session>>;

/// One page of the current view, ready for display
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub records: Vec<&'a Record>,
    pub current_page: usize,
    pub total_pages: usize,
    /// Size of the whole view
    pub filtered_count: usize,
    /// Size of the working dataset
    pub total_records: usize,
}

impl PageView<'_> {
    /// Rows shown on this page
    pub fn visible_count(&self) -> usize {
        self.records.len()
    }
}

/// Record store plus the caller-owned query and paging state.
///
/// Every intent a front end can issue is a method here. Any change to the
/// working dataset or the query sends the pager back to page 1; a new
/// import also resets the query.
#[derive(Debug, Clone)]
pub struct Session {
    store: RecordStore,
    query: QueryState,
    pager: Pager,
    source_name: String,
    delimiter: Option<u8>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Pager::default())
    }
}

impl Session {
    pub fn new(pager: Pager) -> Self {
        Self {
            store: RecordStore::new(),
            query: QueryState::new(),
            pager,
            source_name: String::new(),
            delimiter: None,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let mut session = Self::new(Pager::new(config.page_size));
        session.delimiter = config.delimiter_byte()?;
        Ok(session)
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    // === Loading ===

    /// Replace the dataset with `rows` under the display name `name`
    pub fn load_rows(&mut self, name: &str, rows: Vec<[String; COLUMN_COUNT]>) -> Result<()> {
        self.store.load(rows)?;
        self.source_name = name.to_string();
        self.query.reset();
        self.pager.reset();
        Ok(())
    }

    /// Populate with a generated catalogue of `size` books
    pub fn load_sample(&mut self, size: usize) -> Result<()> {
        let rows = sample::generate_random(size);
        self.load_rows(&sample::sample_name(size), rows)
    }

    /// Import a delimited file; returns any warnings produced while reading.
    /// On failure the current dataset is left as it was.
    pub fn import_file(&mut self, path: &Path) -> Result<Vec<String>> {
        let file_io = FileIO::new(path.to_path_buf(), self.delimiter);
        let result = file_io.load().map_err(|e| {
            warn!(path = %path.display(), error = %e, "Import failed, keeping current dataset");
            e
        })?;
        self.load_rows(&file_io.file_name(), result.rows)?;
        Ok(result.warnings)
    }

    /// Import delimited text that is already in memory
    pub fn import_str(&mut self, name: &str, text: &str) -> Result<()> {
        let rows = fileio::import_str(text, self.delimiter())?;
        self.load_rows(name, rows)
    }

    // === Export ===

    /// Write the full working dataset (never the filtered view) to `path`
    pub fn export_file(&self, path: &Path) -> Result<()> {
        let file_io = FileIO::new(path.to_path_buf(), self.delimiter);
        file_io.write(self.store.working()).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Export failed");
            e
        })
    }

    pub fn export_string(&self) -> Result<String> {
        fileio::export_string(self.store.working(), self.delimiter())
    }

    /// Suggested export file name derived from the loaded source
    pub fn export_file_name(&self) -> String {
        fileio::export_file_name(&self.source_name)
    }

    // === Query intents ===

    pub fn set_search_term(&mut self, term: &str) {
        if self.query.search_term != term {
            self.query.search_term = term.to_string();
            self.pager.reset();
        }
    }

    pub fn set_filter_column(&mut self, filter: FilterColumn) {
        if self.query.filter_column != filter {
            self.query.filter_column = filter;
            self.pager.reset();
        }
    }

    /// Sort by `column`, flipping direction if it is already the sort column
    pub fn set_sort_column(&mut self, column: Column) {
        self.query.toggle_sort(column);
        self.pager.reset();
        debug!(column = %column, direction = self.query.sort_direction.display_name(), "Sort changed");
    }

    pub fn clear_sort(&mut self) {
        if self.query.sort_column.is_some() {
            self.query.clear_sort();
            self.pager.reset();
        }
    }

    // === Paging intents ===

    pub fn set_page(&mut self, n: usize) -> usize {
        let len = self.view().len();
        self.pager.set_page(n, len)
    }

    pub fn next_page(&mut self) -> usize {
        let len = self.view().len();
        self.pager.next(len)
    }

    pub fn previous_page(&mut self) -> usize {
        let len = self.view().len();
        self.pager.previous(len)
    }

    // === Edit intents ===

    pub fn edit_cell(&mut self, id: RecordId, column: Column, value: &str) -> Result<()> {
        self.store.edit_cell(id, column, value.to_string())?;
        self.pager.reset();
        Ok(())
    }

    /// Like `edit_cell`, with the column given by header name
    pub fn edit_cell_named(&mut self, id: RecordId, column: &str, value: &str) -> Result<()> {
        let column: Column = column.parse()?;
        self.edit_cell(id, column, value)
    }

    /// Revert every edit. Callers are expected to confirm with the user
    /// first when `modified_count() > 0`.
    pub fn reset_all(&mut self) -> usize {
        let reverted = self.store.reset_all();
        if reverted > 0 {
            self.pager.reset();
        }
        reverted
    }

    // === Derived state ===

    pub fn view(&self) -> View {
        derive_view(self.store.working(), &self.query)
    }

    pub fn page(&self) -> PageView<'_> {
        let view = self.view();
        let window = self.pager.window(view.rows());
        let working = self.store.working();

        PageView {
            records: window.items.iter().map(|&pos| &working[pos]).collect(),
            current_page: window.current_page,
            total_pages: window.total_pages,
            filtered_count: view.len(),
            total_records: view.total_records(),
        }
    }

    /// "Showing X of Y records", plus the unfiltered total while searching
    pub fn status_line(&self) -> String {
        let page = self.page();
        let mut line = format!(
            "Showing {} of {} records",
            page.visible_count(),
            page.filtered_count
        );
        if self.query.is_searching() {
            line.push_str(&format!(" (filtered from {} total)", page.total_records));
        }
        line
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn current_page(&self) -> usize {
        self.pager.effective_page(self.view().len())
    }

    pub fn page_size(&self) -> usize {
        self.pager.page_size()
    }

    pub fn modified_count(&self) -> usize {
        self.store.modified_count()
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter.unwrap_or(b',')
    }

    pub fn log_summary(&self) {
        info!(
            source = %self.source_name,
            records = self.store.len(),
            modified = self.store.modified_count(),
            "Session state"
        );
    }
}

#[cfg(test)]
mod test;
