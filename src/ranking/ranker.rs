//! Preference-based ordering of book collections.

use std::cmp::Reverse;

use tracing::debug;

use super::parser::{normalize_format, tokenize};
use super::weights::WeightTable;
use crate::config::Preferences;
use crate::models::BookEntry;

/// Which preference to order by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankBy {
    Language,
    Format,
    /// Language first, with format breaking ties
    #[default]
    Both,
}

/// Summed weight of every language the book lists
pub fn language_score(book: &BookEntry, table: &WeightTable, delimiter: &str) -> u32 {
    tokenize(&book.language, delimiter)
        .iter()
        .map(|lang| table.weight(lang))
        .sum()
}

/// Weight of the book's normalized file format
pub fn format_score(book: &BookEntry, table: &WeightTable) -> u32 {
    table.weight(&normalize_format(&book.extension))
}

/// Order books by preferred language, most preferred first
///
/// Books with equal scores keep their incoming (relevance) order.
pub fn rank_by_language<'a>(
    books: &'a mut [BookEntry],
    preferences: &Preferences,
) -> &'a mut [BookEntry] {
    let table = WeightTable::for_languages(tokenize(&preferences.languages, &preferences.delimiter));
    debug!(preferred = table.len(), books = books.len(), "ranking by language");

    let delimiter = preferences.delimiter.as_str();
    books.sort_by_key(|book| Reverse(language_score(book, &table, delimiter)));
    books
}

/// Order books by preferred file format, most preferred first
///
/// Books with equal scores keep their incoming (relevance) order.
pub fn rank_by_format<'a>(
    books: &'a mut [BookEntry],
    preferences: &Preferences,
) -> &'a mut [BookEntry] {
    let table = WeightTable::for_formats(tokenize(&preferences.formats, &preferences.delimiter));
    debug!(preferred = table.len(), books = books.len(), "ranking by format");

    books.sort_by_key(|book| Reverse(format_score(book, &table)));
    books
}

/// Order books by one or both preferences
pub fn rank_books<'a>(
    books: &'a mut [BookEntry],
    preferences: &Preferences,
    by: RankBy,
) -> &'a mut [BookEntry] {
    match by {
        RankBy::Language => rank_by_language(books, preferences),
        RankBy::Format => rank_by_format(books, preferences),
        RankBy::Both => {
            // Stable sorts: the last pass is the primary key.
            let books = rank_by_format(books, preferences);
            rank_by_language(books, preferences)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookEntryBuilder;

    fn book(title: &str, language: &str, extension: &str) -> BookEntry {
        BookEntryBuilder::new(title, "Author", extension, format!("https://example.com/{title}"))
            .language(language)
            .build()
    }

    fn titles(books: &[BookEntry]) -> Vec<&str> {
        books.iter().map(|b| b.title.as_str()).collect()
    }

    #[test]
    fn test_multi_language_book_ranks_first() {
        let mut books = vec![
            book("english-only", "English", "pdf"),
            book("bilingual", "French, English", "pdf"),
            book("german", "German", "pdf"),
        ];
        let prefs = Preferences::new("French, English", "");

        rank_by_language(&mut books, &prefs);
        assert_eq!(titles(&books), vec!["bilingual", "english-only", "german"]);
    }

    #[test]
    fn test_language_score_sums_matches() {
        let table = WeightTable::for_languages(tokenize("French, English", ","));
        assert_eq!(language_score(&book("a", "French, English", "pdf"), &table, ","), 3);
        assert_eq!(language_score(&book("b", "english", "pdf"), &table, ","), 1);
        assert_eq!(language_score(&book("c", "", "pdf"), &table, ","), 0);
    }

    #[test]
    fn test_multi_language_at_or_above_single_match() {
        let prefs = Preferences::new("English, French", "");
        let mut books = vec![book("french", "French", "pdf"), book("both", "English, French", "pdf")];
        rank_by_language(&mut books, &prefs);
        assert_eq!(books[0].title, "both");

        let mut books = vec![book("english", "English", "pdf"), book("both", "French, English", "pdf")];
        rank_by_language(&mut books, &prefs);
        assert_eq!(books[0].title, "both");
    }

    #[test]
    fn test_empty_preferences_keep_order() {
        let original = vec![
            book("a", "German", "pdf"),
            book("b", "English", "epub"),
            book("c", "French", "mobi"),
        ];
        let prefs = Preferences::new("", "");

        let mut books = original.clone();
        rank_by_language(&mut books, &prefs);
        assert_eq!(books, original);

        rank_by_format(&mut books, &prefs);
        assert_eq!(books, original);
    }

    #[test]
    fn test_ties_keep_relative_order() {
        let mut books = vec![
            book("first-pdf", "English", "pdf"),
            book("epub", "English", "epub"),
            book("second-pdf", "English", "PDF"),
            book("third-pdf", "English", ".pdf"),
        ];
        let prefs = Preferences::new("English", "epub, pdf");

        rank_by_format(&mut books, &prefs);
        assert_eq!(
            titles(&books),
            vec!["epub", "first-pdf", "second-pdf", "third-pdf"]
        );
    }

    #[test]
    fn test_format_ranking_ignores_punctuation() {
        let table = WeightTable::for_formats(tokenize("epub, pdf", ","));
        for ext in ["pdf", ".pdf", "PDF", "p_d.f"] {
            assert_eq!(format_score(&book("x", "", ext), &table), 1, "extension {ext}");
        }
    }

    #[test]
    fn test_unsupported_language_preference_ignored() {
        let mut books = vec![book("english", "English", "pdf"), book("elvish", "Elvish", "pdf")];
        let prefs = Preferences::new("Elvish, English", "");
        rank_by_language(&mut books, &prefs);
        assert_eq!(titles(&books), vec!["english", "elvish"]);
    }

    #[test]
    fn test_empty_collection() {
        let mut books: Vec<BookEntry> = Vec::new();
        let prefs = Preferences::default();
        assert!(rank_by_language(&mut books, &prefs).is_empty());
        assert!(rank_by_format(&mut books, &prefs).is_empty());
    }

    #[test]
    fn test_rank_returns_same_collection() {
        let mut books = vec![book("a", "German", "pdf"), book("b", "English", "epub")];
        let prefs = Preferences::new("English", "epub");
        let ranked = rank_by_language(&mut books, &prefs);
        ranked[0].title = "changed".to_string();
        assert_eq!(books[0].title, "changed");
    }

    #[test]
    fn test_rank_both_language_is_primary() {
        let mut books = vec![
            book("de-epub", "German", "epub"),
            book("en-pdf", "English", "pdf"),
            book("en-epub", "English", "epub"),
        ];
        let prefs = Preferences::new("English", "epub, pdf");

        rank_books(&mut books, &prefs, RankBy::Both);
        assert_eq!(titles(&books), vec!["en-epub", "en-pdf", "de-epub"]);
    }

    #[test]
    fn test_custom_delimiter_applies_to_books() {
        let mut books = vec![book("en", "English", "pdf"), book("fr-en", "French; English", "pdf")];
        let prefs = Preferences::new("French; English", "").delimiter(";");
        rank_by_language(&mut books, &prefs);
        assert_eq!(titles(&books), vec!["fr-en", "en"]);
    }
}
