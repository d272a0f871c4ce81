//! Recording collaborators for testing downloads without network or UI.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::download::{DownloadError, Fetcher, FolderSelector, NotificationSink};
use crate::models::{FollowUpAction, Notification};

/// What a [`MockFetcher`] answers with
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Resolve with these bytes
    Body(Vec<u8>),
    /// Fail with an expired-certificate error
    CertificateExpired,
    /// Fail with a network error carrying this message
    Network(String),
    /// Never resolve (until cancelled)
    Pending,
}

/// A fetcher that returns a predefined response and records each call
#[derive(Debug)]
pub struct MockFetcher {
    response: Mutex<MockResponse>,
    calls: Mutex<Vec<(String, bool)>>,
}

impl MockFetcher {
    /// Create a fetcher answering with `response`
    pub fn new(response: MockResponse) -> Self {
        Self {
            response: Mutex::new(response),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replace the configured response
    pub fn set_response(&self, response: MockResponse) {
        let mut guard = self.response.lock().unwrap();
        *guard = response;
    }

    /// Every `(url, ignore_tls)` pair fetched so far
    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str, ignore_tls: bool) -> Result<Vec<u8>, DownloadError> {
        self.calls.lock().unwrap().push((url.to_string(), ignore_tls));
        let response = self.response.lock().unwrap().clone();
        match response {
            MockResponse::Body(bytes) => Ok(bytes),
            MockResponse::CertificateExpired => Err(DownloadError::CertificateExpired(
                "certificate verify failed: certificate has expired".to_string(),
            )),
            MockResponse::Network(message) => Err(DownloadError::Network(message)),
            MockResponse::Pending => std::future::pending().await,
        }
    }
}

/// A folder selector with a fixed answer that counts how often it was asked
#[derive(Debug, Default)]
pub struct MockFolderSelector {
    answer: Option<PathBuf>,
    asked: AtomicUsize,
}

impl MockFolderSelector {
    /// Selector that answers with `answer` (`None` simulates a cancelled dialog)
    pub fn new(answer: Option<PathBuf>) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }

    /// Number of times a folder was requested
    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FolderSelector for MockFolderSelector {
    async fn select_folder(&self) -> Option<PathBuf> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

/// Event observed by a [`RecordingSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Started(String),
    Finished,
    Notified(Notification),
}

/// A notification sink that records events and answers with a fixed choice
#[derive(Debug)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
    choice: FollowUpAction,
    cancel_on_start: bool,
}

impl RecordingSink {
    /// Sink whose user picks `choice` after a success
    pub fn new(choice: FollowUpAction) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            choice,
            cancel_on_start: false,
        }
    }

    /// Sink that cancels every task as soon as it starts
    pub fn cancelling() -> Self {
        Self {
            cancel_on_start: true,
            ..Self::new(FollowUpAction::None)
        }
    }

    /// All events in order
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Only the terminal notifications
    pub fn notifications(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Notified(n) => Some(n),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    fn task_started(&self, title: &str, cancel: CancellationToken) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Started(title.to_string()));
        if self.cancel_on_start {
            cancel.cancel();
        }
    }

    fn task_finished(&self) {
        self.events.lock().unwrap().push(SinkEvent::Finished);
    }

    async fn notify(&self, notification: Notification) -> FollowUpAction {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Notified(notification));
        self.choice
    }
}
