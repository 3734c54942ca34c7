use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::schema::{Column, COLUMN_COUNT};
use crate::table::Record;

/// Detected file format
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Csv,
    Tsv,
}

impl FileFormat {
    /// Detect format from file extension
    fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(FileFormat::Csv),
            "tsv" => Some(FileFormat::Tsv),
            _ => None,
        }
    }

    fn delimiter(&self) -> u8 {
        match self {
            FileFormat::Csv => b',',
            FileFormat::Tsv => b'\t',
        }
    }
}

/// Result of reading a source file, including any warnings
#[derive(Debug)]
pub struct LoadResult {
    pub rows: Vec<[String; COLUMN_COUNT]>,
    pub warnings: Vec<String>,
}

pub struct FileIO {
    pub file_path: PathBuf,
    format: Option<FileFormat>,
    delimiter: Option<u8>,
}

impl FileIO {
    /// `delimiter` overrides the one implied by the file extension
    pub fn new(file_path: PathBuf, delimiter: Option<u8>) -> Self {
        let format = FileFormat::from_extension(&file_path);
        Self {
            file_path,
            format,
            delimiter,
        }
    }

    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string())
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
            .or_else(|| self.format.map(|f| f.delimiter()))
            .unwrap_or(b',')
    }

    /// Read and validate the file. Nothing is handed back unless the whole
    /// file parsed and at least one record survived the import filters.
    pub fn load(&self) -> Result<LoadResult> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::with_capacity(1 << 20, file); // 1 MB

        let raw = parse_delimited(reader, self.delimiter()).map_err(|e| {
            warn!(path = %self.file_path.display(), error = %e, "Failed to parse file");
            e
        })?;
        let raw_count = raw.len();
        let (rows, header_skipped) = filter_rows(raw);
        if rows.is_empty() {
            warn!("Import produced no records");
            return Err(Error::EmptyImport);
        }

        let mut warnings = Vec::new();
        if header_skipped {
            warnings.push("Skipped header row".to_string());
        }
        let dropped = raw_count - rows.len() - usize::from(header_skipped);
        if dropped > 0 {
            warnings.push(format!("Skipped {} empty or incomplete row(s)", dropped));
        }

        info!(
            path = %self.file_path.display(),
            records = rows.len(),
            dropped,
            "File imported"
        );
        Ok(LoadResult { rows, warnings })
    }

    /// Write `records` with a header row. The target is replaced atomically,
    /// so a failed write leaves any existing file intact.
    pub fn write(&self, records: &[Record]) -> Result<()> {
        let parent = match self.file_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut temp_file = NamedTempFile::new_in(parent)?;
        {
            let writer = BufWriter::new(temp_file.as_file_mut());
            write_delimited(writer, records, self.delimiter())?;
        }
        temp_file.as_file().sync_all()?;
        temp_file
            .persist(&self.file_path)
            .map_err(|e| Error::Io(e.error))?;

        info!(path = %self.file_path.display(), records = records.len(), "File exported");
        Ok(())
    }
}

/// Name offered for an export of `source_name`: "books.csv" -> "books_edited.csv"
pub fn export_file_name(source_name: &str) -> String {
    format!("{}_edited.csv", source_name.replacen(".csv", "", 1))
}

/// Tokenize delimited text into raw rows. No header handling, rows may have
/// any number of fields, and values are kept exactly as written.
pub fn parse_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(rows)
}

/// Serialize records in schema column order behind a header row
pub fn write_delimited<W: Write>(writer: W, records: &[Record], delimiter: u8) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(Column::header())?;
    for record in records {
        csv_writer.write_record(record.fields())?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Turn raw tokenized rows into schema rows ready for `RecordStore::load`.
///
/// Drops rows whose fields are all blank, a leading header row, and rows
/// where both Title and Author are blank. Fields past the fifth are ignored,
/// missing ones become "".
///
/// Unlike a trimming reader, values are stored exactly as written: trimming
/// only decides whether a field counts as blank. This keeps an exported
/// dataset byte-identical on re-import even when an edit added surrounding
/// whitespace, at the cost of keeping padded source values padded.
pub fn import_rows(raw: Vec<Vec<String>>) -> Result<Vec<[String; COLUMN_COUNT]>> {
    let (rows, _) = filter_rows(raw);
    if rows.is_empty() {
        warn!("Import produced no records");
        return Err(Error::EmptyImport);
    }
    Ok(rows)
}

/// Import filters; also reports whether a header row was skipped
fn filter_rows(raw: Vec<Vec<String>>) -> (Vec<[String; COLUMN_COUNT]>, bool) {
    let mut rows = Vec::with_capacity(raw.len());
    let mut first = true;
    let mut header_skipped = false;

    for row in raw {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        if std::mem::take(&mut first) && is_header_row(&row) {
            header_skipped = true;
            continue;
        }

        let record = Record::from_row(0, row);
        let title = record.get(Column::Title).trim();
        let author = record.get(Column::Author).trim();
        if title.is_empty() && author.is_empty() {
            continue;
        }
        rows.push(record.fields().clone());
    }

    (rows, header_skipped)
}

fn is_header_row(row: &[String]) -> bool {
    row.len() >= COLUMN_COUNT
        && row
            .iter()
            .zip(Column::header())
            .all(|(cell, name)| cell.trim().eq_ignore_ascii_case(name))
}

/// Parse `text` and run it through the import filters
pub fn import_str(text: &str, delimiter: u8) -> Result<Vec<[String; COLUMN_COUNT]>> {
    import_rows(parse_delimited(text.as_bytes(), delimiter)?)
}

/// Serialize `records` to an in-memory string
pub fn export_string(records: &[Record], delimiter: u8) -> Result<String> {
    let mut buf = Vec::new();
    write_delimited(&mut buf, records, delimiter)?;
    String::from_utf8(buf).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
