//! Folder selectors.

use async_trait::async_trait;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use super::FolderSelector;

/// Selector that always answers with the same directory
#[derive(Debug, Clone)]
pub struct FixedFolder {
    path: PathBuf,
}

impl FixedFolder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FolderSelector for FixedFolder {
    async fn select_folder(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }
}

/// Terminal selector that asks for a folder on stdin
///
/// An empty answer takes the platform download directory, `-` or end of
/// input cancels.
#[derive(Debug, Clone, Default)]
pub struct PromptFolderSelector {
    default: Option<PathBuf>,
}

impl PromptFolderSelector {
    /// Create a selector defaulting to the user's download directory
    pub fn new() -> Self {
        Self {
            default: dirs::download_dir(),
        }
    }

    /// Override the directory used for an empty answer
    pub fn with_default(default: impl Into<PathBuf>) -> Self {
        Self {
            default: Some(default.into()),
        }
    }
}

#[async_trait]
impl FolderSelector for PromptFolderSelector {
    async fn select_folder(&self) -> Option<PathBuf> {
        let default = self.default.clone();
        let answer = tokio::task::spawn_blocking(move || {
            let hint = default
                .as_ref()
                .map(|d| format!(" [{}]", d.display()))
                .unwrap_or_default();
            eprint!("Save to folder{} ('-' to cancel): ", hint);
            let _ = std::io::stderr().flush();

            let mut line = String::new();
            match std::io::stdin().lock().read_line(&mut line) {
                Ok(0) | Err(_) => None,
                Ok(_) => Some(line),
            }
        })
        .await
        .ok()
        .flatten()?;

        let cwd = std::env::current_dir().ok()?;
        parse_folder_answer(&answer, self.default.as_deref(), &cwd)
    }
}

/// Interpret a typed folder answer
///
/// `~` expands to the home directory and relative paths are resolved against
/// `cwd`, so the result is always absolute.
pub fn parse_folder_answer(answer: &str, default: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    let answer = answer.trim();
    if answer == "-" {
        return None;
    }
    if answer.is_empty() {
        return default.map(Path::to_path_buf);
    }

    let path = if answer == "~" {
        dirs::home_dir()?
    } else if let Some(rest) = answer.strip_prefix("~/") {
        dirs::home_dir()?.join(rest)
    } else {
        PathBuf::from(answer)
    };

    if path.is_absolute() {
        Some(path)
    } else {
        Some(cwd.join(path))
    }
}
