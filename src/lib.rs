//! # Shelf Fetch
//!
//! Ranks book search results by the user's preferred languages and file
//! formats, and downloads a chosen book to a collision-free file name.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (BookEntry, Notification, etc.)
//! - [`ranking`]: Attribute parsing, weight tables and the two rankers
//! - [`download`]: File naming and the download orchestrator with its collaborator traits
//! - [`utils`]: HTTP client
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal rendering used by the command-line tool

pub mod config;
pub mod download;
pub mod models;
pub mod ranking;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, Preferences};
pub use download::BookDownloader;
pub use models::BookEntry;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
