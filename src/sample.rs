//! Generated catalogue used when no file is loaded

use rand::seq::SliceRandom;
use rand::Rng;

use crate::schema::COLUMN_COUNT;

/// Number of books generated when nothing else is configured
pub const DEFAULT_SAMPLE_SIZE: usize = 10_000;

const GENRES: [&str; 10] = [
    "Fiction", "Non-Fiction", "Mystery", "Romance", "Sci-Fi",
    "Fantasy", "Biography", "History", "Thriller", "Poetry",
];

const AUTHORS: [&str; 10] = [
    "Jane Smith", "John Doe", "Alice Johnson", "Bob Wilson", "Carol Brown",
    "David Lee", "Emma Davis", "Frank Miller", "Grace Taylor", "Henry Clark",
];

const TITLE_PREFIXES: [&str; 10] = [
    "The", "A", "An", "My", "Our", "Great", "Lost", "Hidden", "Secret", "Ancient",
];

const TITLE_SUFFIXES: [&str; 10] = [
    "Journey", "Adventure", "Mystery", "Story", "Tale",
    "Chronicles", "Legacy", "Destiny", "Quest", "Discovery",
];

/// Display name for a generated dataset of `size` books
pub fn sample_name(size: usize) -> String {
    format!("Sample Book Data ({} entries)", size)
}

/// Generate `size` random books. Titles carry their 1-based sequence number,
/// so every title is unique and every row passes the import filters.
pub fn generate<R: Rng>(size: usize, rng: &mut R) -> Vec<[String; COLUMN_COUNT]> {
    (1..=size).map(|i| generate_book(i, rng)).collect()
}

/// Generate with the thread-local RNG
pub fn generate_random(size: usize) -> Vec<[String; COLUMN_COUNT]> {
    generate(size, &mut rand::thread_rng())
}

fn generate_book<R: Rng>(i: usize, rng: &mut R) -> [String; COLUMN_COUNT] {
    let title = format!("{} {} {}", pick(&TITLE_PREFIXES, rng), pick(&TITLE_SUFFIXES, rng), i);
    let year: u32 = rng.gen_range(1954..=2023);
    let isbn = format!(
        "978-{}-{}-{}",
        rng.gen_range(1000..=9999),
        rng.gen_range(1000..=9999),
        rng.gen_range(10..=99)
    );

    [
        title,
        pick(&AUTHORS, rng).to_string(),
        pick(&GENRES, rng).to_string(),
        year.to_string(),
        isbn,
    ]
}

fn pick<R: Rng>(options: &[&'static str], rng: &mut R) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::fileio::import_rows;
    use crate::util::parse_leading_int;

    #[test]
    fn generates_requested_size() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(generate(250, &mut rng).len(), 250);
        assert!(generate(0, &mut rng).is_empty());
    }

    #[test]
    fn same_seed_same_data() {
        let a = generate(50, &mut StdRng::seed_from_u64(42));
        let b = generate(50, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn values_follow_catalogue_shape() {
        let books = generate(500, &mut StdRng::seed_from_u64(1));
        for (i, book) in books.iter().enumerate() {
            assert!(book[0].ends_with(&format!(" {}", i + 1)));
            assert!(AUTHORS.contains(&book[1].as_str()));
            assert!(GENRES.contains(&book[2].as_str()));

            let year = parse_leading_int(&book[3]);
            assert!((1954..=2023).contains(&year));

            let parts: Vec<&str> = book[4].split('-').collect();
            assert_eq!(parts.len(), 4);
            assert_eq!(parts[0], "978");
            assert_eq!(parts[1].len(), 4);
            assert_eq!(parts[3].len(), 2);
        }
    }

    #[test]
    fn sample_survives_import_filters() {
        let books = generate(100, &mut StdRng::seed_from_u64(3));
        let raw: Vec<Vec<String>> = books.iter().map(|b| b.to_vec()).collect();
        assert_eq!(import_rows(raw).unwrap(), books);
    }

    #[test]
    fn name_mentions_size() {
        assert_eq!(sample_name(10_000), "Sample Book Data (10000 entries)");
    }
}
