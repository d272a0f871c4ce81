//! Single-book downloads with collision-free file naming.
//!
//! [`BookDownloader`] sequences one download: it resolves the destination
//! folder (configured, or chosen through a [`FolderSelector`]), picks a free
//! file name, fetches the payload through a [`Fetcher`] while a progress
//! indicator is shown, writes the file and reports exactly one outcome to a
//! [`NotificationSink`]. Failures never propagate out of a download call.
//!
//! The three collaborator traits are the seams a host application plugs its
//! own UI into; [`mock`] has recording implementations for tests.

mod error;
mod filename;
mod folder;
pub mod mock;
mod orchestrator;

pub use error::{is_certificate_expired, DownloadError};
pub use filename::{build_base_name, build_file_name, resolve_unique_path};
pub use folder::{parse_folder_answer, FixedFolder, PromptFolderSelector};
pub use orchestrator::{BookDownloader, CERTIFICATE_EXPIRED_MESSAGE};

use async_trait::async_trait;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::models::{FollowUpAction, Notification};

/// Fetches the binary content of a URL
#[async_trait]
pub trait Fetcher: Send + Sync + std::fmt::Debug {
    /// Fetch the full body of `url`
    ///
    /// When `ignore_tls` is set, certificate verification is skipped for this
    /// request only.
    async fn fetch(&self, url: &str, ignore_tls: bool) -> Result<Vec<u8>, DownloadError>;
}

/// Interactive choice of a target directory
#[async_trait]
pub trait FolderSelector: Send + Sync {
    /// Returns an absolute directory path, or `None` if the user cancelled
    async fn select_folder(&self) -> Option<PathBuf>;
}

/// Receives progress and outcome events for a download
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// A fetch started; cancelling `cancel` aborts it
    fn task_started(&self, title: &str, cancel: CancellationToken);

    /// The fetch resolved, failed or was cancelled
    fn task_finished(&self);

    /// Terminal outcome of the download
    ///
    /// For a success, returns the follow-up the user picked among the offered
    /// actions.
    async fn notify(&self, notification: Notification) -> FollowUpAction;
}

/// Sink that only logs, for headless use
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl NotificationSink for NullSink {
    fn task_started(&self, title: &str, _cancel: CancellationToken) {
        tracing::debug!("{}", title);
    }

    fn task_finished(&self) {}

    async fn notify(&self, notification: Notification) -> FollowUpAction {
        match &notification {
            Notification::Success { message, .. } => tracing::info!("{}", message),
            Notification::Failure { message, .. } => tracing::warn!("{}", message),
        }
        FollowUpAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FailureKind;

    #[test]
    fn test_null_sink_never_asks_for_follow_up() {
        let sink = NullSink;
        sink.task_started("Downloading \"Dune\"", CancellationToken::new());
        sink.task_finished();

        let choice = tokio_test::block_on(sink.notify(Notification::Success {
            message: "Downloaded".to_string(),
            path: PathBuf::from("/tmp/dune.epub"),
            actions: vec![FollowUpAction::Open, FollowUpAction::Reveal],
        }));
        assert_eq!(choice, FollowUpAction::None);

        let choice = tokio_test::block_on(sink.notify(Notification::Failure {
            message: "Failed".to_string(),
            kind: FailureKind::Other,
        }));
        assert_eq!(choice, FollowUpAction::None);
    }
}
