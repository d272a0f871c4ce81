//! Download orchestration: folder, name, fetch, write, report.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::filename::{build_base_name, resolve_unique_path};
use super::{DownloadError, Fetcher, FolderSelector, NotificationSink};
use crate::config::DownloadConfig;
use crate::models::{BookEntry, FollowUpAction, Notification, PostDownloadAction};

/// Message shown when the source presents an expired certificate
pub const CERTIFICATE_EXPIRED_MESSAGE: &str = "Download failed: the server's certificate has expired. \
Try a different download gateway, or set `downloads.ignore_tls = true` to skip certificate verification.";

/// Runs single-book downloads against a configured destination
#[derive(Debug, Clone)]
pub struct BookDownloader {
    config: DownloadConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl BookDownloader {
    /// Create a downloader with the given settings and fetcher
    pub fn new(config: DownloadConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Download settings in use
    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Download `book` from `url` into the configured directory
    ///
    /// Falls back to `selector` when no directory is configured.
    pub async fn download(
        &self,
        url: &str,
        book: &BookEntry,
        selector: &dyn FolderSelector,
        sink: &dyn NotificationSink,
    ) -> PostDownloadAction {
        match &self.config.default_path {
            Some(dir) => self.download_to(url, book, dir, sink).await,
            None => self.download_to_selected_folder(url, book, selector, sink).await,
        }
    }

    /// Download `book` from `url` into a folder chosen through `selector`
    ///
    /// If the selector returns no folder nothing is fetched and nothing is
    /// reported.
    pub async fn download_to_selected_folder(
        &self,
        url: &str,
        book: &BookEntry,
        selector: &dyn FolderSelector,
        sink: &dyn NotificationSink,
    ) -> PostDownloadAction {
        let Some(dir) = selector.select_folder().await else {
            debug!("folder selection cancelled, skipping \"{}\"", book.title);
            return PostDownloadAction::None;
        };
        self.download_to(url, book, &dir, sink).await
    }

    /// Download `book` from `url` into `dir`
    pub async fn download_to(
        &self,
        url: &str,
        book: &BookEntry,
        dir: &Path,
        sink: &dyn NotificationSink,
    ) -> PostDownloadAction {
        let base = build_base_name(book);
        let path = resolve_unique_path(dir, &base, &book.extension);
        debug!("resolved download path {}", path.display());

        let cancel = CancellationToken::new();
        sink.task_started(&format!("Downloading \"{}\"", book.title), cancel.clone());
        info!("downloading \"{}\" from {}", book.title, url);
        let fetched = self.fetch(url, &cancel).await;
        sink.task_finished();

        let written = match fetched {
            Ok(bytes) => write_new_file(path, &base, &book.extension, &bytes).await,
            Err(err) => Err(err),
        };

        match written {
            Ok(path) => {
                info!("saved \"{}\" to {}", book.title, path.display());
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let choice = sink
                    .notify(Notification::Success {
                        message: format!("Downloaded \"{}\" to {}", file_name, dir.display()),
                        path: path.clone(),
                        actions: vec![FollowUpAction::Open, FollowUpAction::Reveal],
                    })
                    .await;
                PostDownloadAction::from_choice(choice, &path)
            }
            Err(err) => {
                warn!("download of \"{}\" failed: {}", book.title, err);
                sink.notify(failure_notification(book, &err)).await;
                PostDownloadAction::None
            }
        }
    }

    async fn fetch(&self, url: &str, cancel: &CancellationToken) -> Result<Vec<u8>, DownloadError> {
        url::Url::parse(url).map_err(|e| DownloadError::InvalidUrl(format!("{}: {}", url, e)))?;

        if self.config.ignore_tls {
            debug!("TLS verification disabled for {}", url);
        }

        tokio::select! {
            _ = cancel.cancelled() => Err(DownloadError::Cancelled),
            result = self.fetcher.fetch(url, self.config.ignore_tls) => result,
        }
    }
}

/// Write the payload to `path`, never replacing an existing file
///
/// If `path` was taken since it was probed, the next free suffix is used.
async fn write_new_file(
    mut path: PathBuf,
    base: &str,
    extension: &str,
    bytes: &[u8],
) -> Result<PathBuf, DownloadError> {
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    if !dir.as_os_str().is_empty() {
        tokio::fs::create_dir_all(&dir).await?;
    }

    loop {
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => {
                write_or_discard(file, &path, bytes).await?;
                return Ok(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                let next = resolve_unique_path(&dir, base, extension);
                if next == path {
                    // The probe cannot see the entry that blocks us.
                    return Err(e.into());
                }
                debug!("{} appeared before write, retrying as {}", path.display(), next.display());
                path = next;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Write the whole payload, removing the file again if that fails
///
/// A failed download never leaves a truncated file under the book's name.
async fn write_or_discard<W>(mut writer: W, path: &Path, bytes: &[u8]) -> Result<(), DownloadError>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(bytes).await?;
        writer.flush().await
    }
    .await;
    drop(writer);

    if let Err(e) = written {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!("removed partial file {}", path.display()),
            Err(rm) if rm.kind() == std::io::ErrorKind::NotFound => {}
            Err(rm) => warn!("failed to remove partial file {}: {}", path.display(), rm),
        }
        return Err(e.into());
    }
    Ok(())
}

fn failure_notification(book: &BookEntry, err: &DownloadError) -> Notification {
    let message = match err {
        DownloadError::CertificateExpired(_) => CERTIFICATE_EXPIRED_MESSAGE.to_string(),
        DownloadError::Cancelled => format!("Download of \"{}\" cancelled", book.title),
        other => format!("Failed to download \"{}\": {}", book.title, other),
    };
    Notification::Failure {
        message,
        kind: err.kind(),
    }
}
