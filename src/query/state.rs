use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::schema::Column;

/// Sorting direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// Which columns a search term is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterColumn {
    #[default]
    All,
    Only(Column),
}

impl fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterColumn::All => f.write_str("all"),
            FilterColumn::Only(col) => write!(f, "{}", col),
        }
    }
}

impl FromStr for FilterColumn {
    type Err = Error;

    /// "all" (any case) or a column name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(FilterColumn::All)
        } else {
            s.parse().map(FilterColumn::Only)
        }
    }
}

/// User-controlled search/filter/sort settings. Owned by the caller and
/// passed into the pipeline; nothing here touches the data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryState {
    pub search_term: String,
    pub filter_column: FilterColumn,
    pub sort_column: Option<Column>,
    pub sort_direction: SortDirection,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_searching(&self) -> bool {
        !self.search_term.is_empty()
    }

    /// Sort by `column`; choosing the current sort column again flips the
    /// direction, choosing a new one starts ascending
    pub fn toggle_sort(&mut self, column: Column) {
        if self.sort_column == Some(column) {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_column = Some(column);
            self.sort_direction = SortDirection::Ascending;
        }
    }

    pub fn clear_sort(&mut self) {
        self.sort_column = None;
        self.sort_direction = SortDirection::Ascending;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
