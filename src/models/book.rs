//! Book model representing a single catalog search result.

use serde::{Deserialize, Serialize};

/// A book record as returned by a catalog search
///
/// Entries are produced by the search collaborator and are never mutated by
/// ranking; only the order of a collection changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    /// Book title
    pub title: String,

    /// Author(s) as displayed by the catalog
    pub author: String,

    /// Publication year, if known
    #[serde(default)]
    pub year: Option<String>,

    /// Language(s), possibly several joined by a delimiter ("French, English")
    #[serde(default)]
    pub language: String,

    /// File format as reported by the catalog ("epub", ".pdf", "AZW3")
    pub extension: String,

    /// URL the file is fetched from
    #[serde(alias = "url")]
    pub download_url: String,
}

impl BookEntry {
    /// Create a new entry with the required fields
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        extension: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year: None,
            language: String::new(),
            extension: extension.into(),
            download_url: download_url.into(),
        }
    }

    /// Returns the year if it is present and not blank
    pub fn year(&self) -> Option<&str> {
        self.year
            .as_deref()
            .map(str::trim)
            .filter(|y| !y.is_empty())
    }
}

/// Builder for constructing [`BookEntry`] values
#[derive(Debug, Clone)]
pub struct BookEntryBuilder {
    book: BookEntry,
}

impl BookEntryBuilder {
    /// Create a new builder with required fields
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        extension: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            book: BookEntry::new(title, author, extension, download_url),
        }
    }

    /// Set publication year
    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.book.year = Some(year.into());
        self
    }

    /// Set language(s)
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.book.language = language.into();
        self
    }

    /// Build the entry
    pub fn build(self) -> BookEntry {
        self.book
    }
}
