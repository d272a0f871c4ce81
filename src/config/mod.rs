//! Configuration management.
//!
//! The host builds one [`Config`] at startup and passes it (or the relevant
//! section) into every ranking and download call.

mod file_config;

pub use file_config::{find_config_file, ConfigFile, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Ranking preferences
    #[serde(default)]
    pub preferences: Preferences,

    /// Download settings
    #[serde(default)]
    pub downloads: DownloadConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// User-declared ranking preferences, most-wanted first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Preferred languages ("French, English")
    #[serde(default = "default_languages")]
    pub languages: String,

    /// Preferred file formats ("epub, pdf")
    #[serde(default = "default_formats")]
    pub formats: String,

    /// Delimiter used in both preference strings and per-book language lists
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Preferences {
    /// Create preferences from the two delimited strings, using the default delimiter
    pub fn new(languages: impl Into<String>, formats: impl Into<String>) -> Self {
        Self {
            languages: languages.into(),
            formats: formats.into(),
            delimiter: default_delimiter(),
        }
    }

    /// Set the delimiter
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new(default_languages(), default_formats())
    }
}

fn default_languages() -> String {
    "English".to_string()
}

fn default_formats() -> String {
    "epub, mobi, azw3, pdf".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// Download configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Fixed download directory; when unset the folder is chosen interactively
    #[serde(default)]
    pub default_path: Option<PathBuf>,

    /// Skip TLS certificate verification for book downloads
    #[serde(default)]
    pub ignore_tls: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            default_path: None,
            ignore_tls: false,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a file, with `SHELF_FETCH_*` environment overrides
///
/// Nested keys use a double underscore, e.g. `SHELF_FETCH_DOWNLOADS__IGNORE_TLS=true`.
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(
            config::Environment::with_prefix("SHELF_FETCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Get the default configuration
pub fn get_config() -> Config {
    Config::default()
}
