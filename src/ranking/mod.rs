//! Preference ranking for book search results.
//!
//! Rankings are pure: they read the [`Preferences`](crate::config::Preferences)
//! passed in, build a fresh [`WeightTable`] and stable-sort the collection in
//! place. Equal scores never disturb the incoming catalog order.
//!
//! ```rust
//! use shelf_fetch::config::Preferences;
//! use shelf_fetch::models::BookEntryBuilder;
//! use shelf_fetch::ranking::rank_by_language;
//!
//! let mut books = vec![
//!     BookEntryBuilder::new("A", "X", "pdf", "https://example.com/a").language("English").build(),
//!     BookEntryBuilder::new("B", "Y", "pdf", "https://example.com/b").language("French, English").build(),
//! ];
//! rank_by_language(&mut books, &Preferences::new("French, English", ""));
//! assert_eq!(books[0].title, "B");
//! ```

mod languages;
mod parser;
mod ranker;
mod weights;

pub use languages::{is_supported_language, SUPPORTED_LANGUAGES};
pub use parser::{normalize_format, tokenize};
pub use ranker::{format_score, language_score, rank_books, rank_by_format, rank_by_language, RankBy};
pub use weights::WeightTable;
