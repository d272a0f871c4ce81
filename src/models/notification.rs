//! Outcome notifications and follow-up actions for downloads.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;

/// A follow-up the user may pick after a successful download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpAction {
    /// Do nothing
    None,
    /// Open the downloaded file with the default application
    Open,
    /// Show the file in the platform file browser
    Reveal,
}

impl FollowUpAction {
    /// Label shown to the user for this action
    pub fn label(&self) -> &'static str {
        match self {
            FollowUpAction::None => "Dismiss",
            FollowUpAction::Open => "Open",
            FollowUpAction::Reveal => "Reveal in folder",
        }
    }
}

/// Classification of a failed download, for presentation purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The fetch was aborted through the progress indicator
    Cancelled,
    /// The server presented an expired TLS certificate
    CertificateExpired,
    /// Any other network or filesystem failure
    Other,
}

/// Terminal outcome of one download, delivered to a notification sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The file was written
    Success {
        message: String,
        path: PathBuf,
        actions: Vec<FollowUpAction>,
    },
    /// The download failed
    Failure { message: String, kind: FailureKind },
}

impl Notification {
    /// Message text of the notification
    pub fn message(&self) -> &str {
        match self {
            Notification::Success { message, .. } | Notification::Failure { message, .. } => {
                message
            }
        }
    }

    /// Whether this is a success notification
    pub fn is_success(&self) -> bool {
        matches!(self, Notification::Success { .. })
    }
}

/// Post-download action requested by the user, for the calling layer to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostDownloadAction {
    None,
    Open(PathBuf),
    Reveal(PathBuf),
}

impl PostDownloadAction {
    /// Combine the user's choice with the path that was written
    pub fn from_choice(choice: FollowUpAction, path: &Path) -> Self {
        match choice {
            FollowUpAction::None => PostDownloadAction::None,
            FollowUpAction::Open => PostDownloadAction::Open(path.to_path_buf()),
            FollowUpAction::Reveal => PostDownloadAction::Reveal(path.to_path_buf()),
        }
    }

    /// Launch the platform handler for this action
    pub fn perform(&self) -> std::io::Result<()> {
        match self {
            PostDownloadAction::None => Ok(()),
            PostDownloadAction::Open(path) => open_with_default_app(path),
            PostDownloadAction::Reveal(path) => reveal_in_file_browser(path),
        }
    }
}

fn open_with_default_app(path: &Path) -> std::io::Result<()> {
    if cfg!(target_os = "windows") {
        Command::new("explorer").arg(path).spawn()?;
        return Ok(());
    }
    if cfg!(target_os = "macos") {
        Command::new("open").arg(path).spawn()?;
        return Ok(());
    }
    Command::new("xdg-open").arg(path).spawn()?;
    Ok(())
}

fn reveal_in_file_browser(path: &Path) -> std::io::Result<()> {
    if cfg!(target_os = "windows") {
        let mut select = std::ffi::OsString::from("/select,");
        select.push(path.as_os_str());
        Command::new("explorer").arg(select).spawn()?;
        return Ok(());
    }
    if cfg!(target_os = "macos") {
        Command::new("open").arg("-R").arg(path).spawn()?;
        return Ok(());
    }
    // xdg-open has no "select" mode, open the containing folder instead.
    let folder = path.parent().unwrap_or(path);
    Command::new("xdg-open").arg(folder).spawn()?;
    Ok(())
}
