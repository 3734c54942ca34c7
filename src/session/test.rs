use super::*;

use std::io::Write;
use std::thread;

use tempfile::NamedTempFile;

use crate::error::Error;
use crate::query::SortDirection;

fn titles(page: &PageView) -> Vec<String> {
    page.records
        .iter()
        .map(|r| r.get(Column::Title).to_string())
        .collect()
}

fn books_session(page_size: usize) -> Session {
    let mut session = Session::new(Pager::new(page_size));
    session
        .import_str(
            "books.csv",
            "Dune,Frank Herbert,Sci-Fi,1965,111\n\
             Nine Lives,Jane Smith,Mystery Cat Tales,2003,222\n\
             Emma,Jane Austen,Romance,1815,333\n\
             Ubik,Philip K. Dick,Sci-Fi,1969,444\n\
             Beloved,Toni Morrison,Fiction,1987,555\n",
        )
        .unwrap();
    session
}

#[test]
fn pages_and_status() {
    let mut session = books_session(2);
    let page = session.page();
    assert_eq!(titles(&page), ["Dune", "Nine Lives"]);
    assert_eq!(page.total_pages, 3);
    assert_eq!(session.status_line(), "Showing 2 of 5 records");

    assert_eq!(session.next_page(), 2);
    assert_eq!(session.next_page(), 3);
    assert_eq!(session.next_page(), 3);
    assert_eq!(titles(&session.page()), ["Beloved"]);
    assert_eq!(session.previous_page(), 2);
    assert_eq!(session.set_page(99), 3);
}

#[test]
fn search_resets_page_and_reports_total() {
    let mut session = books_session(2);
    session.set_page(3);
    session.set_search_term("jane");
    assert_eq!(session.current_page(), 1);
    assert_eq!(titles(&session.page()), ["Nine Lives", "Emma"]);
    assert_eq!(
        session.status_line(),
        "Showing 2 of 2 records (filtered from 5 total)"
    );
}

#[test]
fn unchanged_search_keeps_page() {
    let mut session = books_session(2);
    session.set_search_term("");
    session.set_page(2);
    session.set_search_term("");
    assert_eq!(session.current_page(), 2);
}

#[test]
fn filter_column_scenario() {
    let mut session = books_session(50);
    session.set_search_term("cat");
    assert_eq!(titles(&session.page()), ["Nine Lives"]);

    session.set_filter_column(FilterColumn::Only(Column::Author));
    assert!(session.page().records.is_empty());
    assert_eq!(session.page().total_pages, 1);
    assert_eq!(session.current_page(), 1);
}

#[test]
fn sort_toggles_and_resets_page() {
    let mut session = books_session(2);
    session.set_page(2);
    session.set_sort_column(Column::PublishedYear);
    assert_eq!(session.current_page(), 1);
    assert_eq!(titles(&session.page()), ["Emma", "Dune"]);

    session.set_sort_column(Column::PublishedYear);
    assert_eq!(session.query().sort_direction, SortDirection::Descending);
    assert_eq!(titles(&session.page()), ["Nine Lives", "Beloved"]);

    session.clear_sort();
    assert_eq!(titles(&session.page()), ["Dune", "Nine Lives"]);
}

#[test]
fn edit_tracks_modification_and_resets_page() {
    let mut session = books_session(2);
    session.set_page(3);
    session.edit_cell(5, Column::Genre, "Classic").unwrap();

    assert_eq!(session.current_page(), 1);
    assert_eq!(session.modified_count(), 1);
    assert!(session.store().is_modified(5).unwrap());
    assert!(session.store().cell_changed(5, Column::Genre).unwrap());
}

#[test]
fn edit_by_column_name() {
    let mut session = books_session(50);
    session.edit_cell_named(1, "isbn", "999").unwrap();
    assert_eq!(session.store().get(1).unwrap().get(Column::Isbn), "999");

    let err = session.edit_cell_named(1, "Pages", "300").unwrap_err();
    assert!(matches!(err, Error::UnknownColumn(_)));
    let err = session.edit_cell(42, Column::Title, "x").unwrap_err();
    assert!(matches!(err, Error::NotFound(42)));
}

#[test]
fn edited_rows_move_under_active_sort() {
    let mut session = books_session(50);
    session.set_sort_column(Column::Title);
    session.edit_cell(4, Column::Title, "Aardvark").unwrap();
    assert_eq!(titles(&session.page())[0], "Aardvark");
}

#[test]
fn reset_all_reverts_edits() {
    let mut session = books_session(50);
    session.edit_cell(1, Column::Title, "Dune Messiah").unwrap();
    session.edit_cell(2, Column::Author, "J. Smith").unwrap();

    assert_eq!(session.reset_all(), 2);
    assert_eq!(session.modified_count(), 0);
    assert_eq!(session.store().working(), session.store().original());
    assert_eq!(session.reset_all(), 0);
}

#[test]
fn import_resets_query_and_page() {
    let mut session = books_session(2);
    session.set_search_term("sci");
    session.set_filter_column(FilterColumn::Only(Column::Genre));
    session.set_sort_column(Column::Title);
    session.set_page(2);

    session.import_str("other.csv", "Solaris,Lem\n").unwrap();
    assert_eq!(session.query(), &QueryState::default());
    assert_eq!(session.current_page(), 1);
    assert_eq!(session.source_name(), "other.csv");
    assert_eq!(session.store().working()[0].id, 1);
}

#[test]
fn failed_import_keeps_dataset() {
    let mut session = books_session(50);
    session.edit_cell(3, Column::Title, "Persuasion").unwrap();
    session.set_search_term("jane");

    let err = session.import_str("empty.csv", ",,\n  ,\n").unwrap_err();
    assert!(matches!(err, Error::EmptyImport));

    let mut bad = NamedTempFile::with_suffix(".csv").unwrap();
    bad.write_all(b"ok,row\n\xff\xff,broken\n").unwrap();
    let err = session.import_file(bad.path()).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));

    assert_eq!(session.source_name(), "books.csv");
    assert_eq!(session.store().len(), 5);
    assert_eq!(session.modified_count(), 1);
    assert_eq!(session.query().search_term, "jane");
}

#[test]
fn export_ignores_view_and_round_trips() {
    let mut session = books_session(2);
    session.set_search_term("sci");
    session.set_sort_column(Column::Title);
    session.set_sort_column(Column::Title);
    session.edit_cell(4, Column::Isbn, "444, rev. \"2\"").unwrap();

    let out = NamedTempFile::with_suffix(".csv").unwrap();
    session.export_file(out.path()).unwrap();

    let mut reloaded = Session::default();
    reloaded.import_file(out.path()).unwrap();
    assert_eq!(reloaded.store().len(), 5);
    for (a, b) in reloaded.store().working().iter().zip(session.store().working()) {
        assert_eq!(a.fields(), b.fields());
    }
    assert_eq!(reloaded.modified_count(), 0);
}

#[test]
fn export_string_starts_with_header() {
    let session = books_session(50);
    let text = session.export_string().unwrap();
    assert!(text.starts_with("Title,Author,Genre,PublishedYear,ISBN\n"));
    assert_eq!(text.lines().count(), 6);
}

#[test]
fn export_name_follows_source() {
    let session = books_session(50);
    assert_eq!(session.export_file_name(), "books_edited.csv");
}

#[test]
fn sample_session() {
    let mut session = Session::default();
    session.load_sample(120).unwrap();
    assert_eq!(session.store().len(), 120);
    assert_eq!(session.source_name(), "Sample Book Data (120 entries)");
    assert_eq!(session.page().total_pages, 3);
    assert_eq!(session.page().visible_count(), 50);

    assert!(matches!(session.load_sample(0), Err(Error::EmptyImport)));
    assert_eq!(session.store().len(), 120);
}

#[test]
fn from_config_applies_page_size_and_delimiter() {
    let config = EngineConfig::from_toml("page_size = 3\ndelimiter = \";\"").unwrap();
    let mut session = Session::from_config(&config).unwrap();
    session.import_str("semi.csv", "a;b\nc;d\ne;f\ng;h\n").unwrap();
    assert_eq!(session.page_size(), 3);
    assert_eq!(session.page().total_pages, 2);
    assert_eq!(session.store().working()[1].get(Column::Author), "d");
}

#[test]
fn shared_session_serializes_edits() {
    let shared = books_session(50).into_shared();

    let handles: Vec<_> = (1..=5u64)
        .map(|id| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let mut session = shared.lock().unwrap();
                session.edit_cell(id, Column::Genre, "Edited").unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let session = shared.lock().unwrap();
    assert_eq!(session.modified_count(), 5);
}
