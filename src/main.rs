use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use booktable::config::EngineConfig;
use booktable::query::{FilterColumn, SortDirection};
use booktable::session::{PageView, Session};
use booktable::util::{display_width, pad_to_width, truncate_to_width};
use booktable::{Column, Error, Result};

/// Widest a column is allowed to print
const MAX_COL_WIDTH: usize = 30;

/// Search, sort, page and edit a CSV book catalogue
#[derive(Parser, Debug)]
#[command(name = "booktable", version)]
struct Args {
    /// CSV file to load (Title, Author, Genre, PublishedYear, ISBN; no header).
    /// A generated sample is used when omitted.
    file: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Field delimiter (comma, tab, semicolon, pipe, or a single character)
    #[arg(short, long, value_parser = parse_delimiter)]
    delimiter: Option<u8>,

    /// Number of generated books when no file is given
    #[arg(long)]
    sample_size: Option<usize>,

    /// Case-insensitive search term
    #[arg(short, long)]
    search: Option<String>,

    /// Restrict the search to one column ("all" for every column)
    #[arg(short = 'f', long, default_value = "all")]
    filter_column: FilterColumn,

    /// Sort by column; repeat the same column to sort descending
    #[arg(long)]
    sort: Vec<Column>,

    /// Page to show (1-based)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Edit a cell, as ID:COLUMN=VALUE
    #[arg(short, long, value_parser = parse_edit)]
    edit: Vec<(u64, Column, String)>,

    /// Revert all edits before showing and exporting
    #[arg(long)]
    reset: bool,

    /// Write the full working dataset to this file
    #[arg(short = 'o', long)]
    export: Option<PathBuf>,
}

/// Parse a delimiter string into a byte
fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    match s.to_lowercase().as_str() {
        "comma" | "," => Ok(b','),
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "semicolon" | ";" => Ok(b';'),
        "pipe" | "|" => Ok(b'|'),
        _ if s.len() == 1 => Ok(s.as_bytes()[0]),
        _ => Err(format!(
            "Invalid delimiter: '{}'. Use comma, tab, semicolon, pipe, or a single character.",
            s
        )),
    }
}

/// Parse "ID:COLUMN=VALUE"
fn parse_edit(s: &str) -> std::result::Result<(u64, Column, String), String> {
    let (target, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected ID:COLUMN=VALUE, got '{}'", s))?;
    let (id, column) = target
        .split_once(':')
        .ok_or_else(|| format!("Expected ID:COLUMN=VALUE, got '{}'", s))?;
    let id = id
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("Invalid record id '{}': {}", id, e))?;
    let column = column.parse::<Column>().map_err(|e| e.to_string())?;
    Ok((id, column, value.to_string()))
}

/// Handle panics gracefully
fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        if let Some(location) = info.location() {
            error!(
                file = location.file(),
                line = location.line(),
                "panic occured"
            );
        } else {
            error!("panic occured");
        }

        if let Some(s) = info.payload().downcast_ref::<&str>() {
            error!(message = %s);
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            error!(message = %s);
        }

        default_hook(info);
    }));
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn column_label(session: &Session, col: Column) -> String {
    let query = session.query();
    match (query.sort_column, query.sort_direction) {
        (Some(c), SortDirection::Ascending) if c == col => format!("{} ^", col.name()),
        (Some(c), SortDirection::Descending) if c == col => format!("{} v", col.name()),
        _ => col.name().to_string(),
    }
}

/// Print the page as an aligned table. '*' before the id marks a modified
/// record, '*' before a cell marks a changed value.
fn print_page(page: &PageView, session: &Session) {
    let store = session.store();
    let labels: Vec<String> = Column::ALL.iter().map(|&col| column_label(session, col)).collect();
    let id_width = page
        .records
        .iter()
        .map(|r| r.id.to_string().len())
        .max()
        .unwrap_or(0)
        .max(2);

    let widths: Vec<usize> = Column::ALL
        .iter()
        .zip(&labels)
        .map(|(&col, label)| {
            page.records
                .iter()
                .map(|r| display_width(r.get(col)))
                .chain(std::iter::once(display_width(label)))
                .max()
                .unwrap_or(3)
                .min(MAX_COL_WIDTH)
        })
        .collect();

    let mut header = format!("  {}", pad_to_width("ID", id_width));
    for (label, &w) in labels.iter().zip(&widths) {
        header.push_str(" | ");
        header.push_str(&pad_to_width(&truncate_to_width(label, w), w));
    }
    println!("{}", header);
    println!("{}", "-".repeat(display_width(&header)));

    for record in &page.records {
        let marker = if record.is_modified() { '*' } else { ' ' };
        let mut line = format!("{} {}", marker, pad_to_width(&record.id.to_string(), id_width));
        let changed_cols = store.changed_columns(record.id).unwrap_or_default();
        for (&col, &w) in Column::ALL.iter().zip(&widths) {
            let changed = changed_cols.contains(&col);
            line.push_str(if changed { " |*" } else { " | " });
            line.push_str(&pad_to_width(&truncate_to_width(record.get(col), w), w));
        }
        println!("{}", line);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = EngineConfig::load(args.config.as_deref())?;
    if let Some(d) = args.delimiter {
        config.delimiter = Some(char::from(d));
    }
    if let Some(n) = args.sample_size {
        config.sample_size = n;
    }

    init_tracing(&config.log_filter);
    install_panic_hook();
    info!("Booktable started");

    let mut session = Session::from_config(&config)?;

    match &args.file {
        Some(path) => {
            let warnings = session.import_file(path).map_err(|e| {
                error!(error = %e, "Failed to load file");
                e
            })?;
            for w in warnings {
                eprintln!("{}", w);
            }
        }
        None => session.load_sample(config.sample_size)?,
    }

    for (id, column, value) in &args.edit {
        match session.edit_cell(*id, *column, value) {
            Ok(()) => {}
            Err(Error::NotFound(id)) => {
                error!(id, "Edit skipped, no such record");
            }
            Err(e) => return Err(e),
        }
    }
    if args.reset {
        session.reset_all();
    }

    if let Some(term) = &args.search {
        session.set_search_term(term);
    }
    session.set_filter_column(args.filter_column);
    for &column in &args.sort {
        session.set_sort_column(column);
    }
    session.set_page(args.page);

    let page = session.page();
    println!("{}", session.source_name());
    print_page(&page, &session);
    println!();
    println!("{}", session.status_line());
    println!("Page {} of {}", page.current_page, page.total_pages);
    if session.modified_count() > 0 {
        println!("{} modified record(s)", session.modified_count());
    }

    if let Some(path) = &args.export {
        session.export_file(path)?;
        println!("Exported to {}", path.display());
    }

    session.log_summary();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
