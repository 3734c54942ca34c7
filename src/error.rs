use thiserror::Error;

use crate::table::record::RecordId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The delimited source could not be tokenized
    #[error("Error parsing CSV file: {0}")]
    Parse(String),

    /// The source parsed but no row survived the import filters
    #[error("No valid records found in import")]
    EmptyImport,

    /// An edit targeted an id that is not in the working dataset
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        if !e.is_io_error() {
            return Error::Parse(e.to_string());
        }
        match e.into_kind() {
            csv::ErrorKind::Io(io) => Error::Io(io),
            kind => Error::Parse(format!("{:?}", kind)),
        }
    }
}
