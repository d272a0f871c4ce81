//! Core data models for book records and download outcomes.

mod book;
mod notification;

pub use book::{BookEntry, BookEntryBuilder};
pub use notification::{FailureKind, FollowUpAction, Notification, PostDownloadAction};
