use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Number of columns every record carries
pub const COLUMN_COUNT: usize = 5;

/// The fixed book schema, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Title,
    Author,
    Genre,
    PublishedYear,
    Isbn,
}

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Title,
        Column::Author,
        Column::Genre,
        Column::PublishedYear,
        Column::Isbn,
    ];

    /// Positional index of the column within a record and within a CSV row
    pub fn index(self) -> usize {
        match self {
            Column::Title => 0,
            Column::Author => 1,
            Column::Genre => 2,
            Column::PublishedYear => 3,
            Column::Isbn => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::Title => "Title",
            Column::Author => "Author",
            Column::Genre => "Genre",
            Column::PublishedYear => "PublishedYear",
            Column::Isbn => "ISBN",
        }
    }

    /// Whether the column sorts as an integer rather than as text
    pub fn is_numeric(self) -> bool {
        matches!(self, Column::PublishedYear)
    }

    pub fn header() -> [&'static str; COLUMN_COUNT] {
        Self::ALL.map(Column::name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = Error;

    /// Case-insensitive lookup by header name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Column::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownColumn(s.to_string()))
    }
}
