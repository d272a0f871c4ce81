//! Configuration file support for shelf-fetch.
//!
//! # Configuration File Format
//!
//! ```toml
//! [preferences]
//! languages = "French, English"
//! formats = "epub, mobi, azw3, pdf"
//! delimiter = ","
//!
//! [downloads]
//! default_path = "~/Books"
//! ignore_tls = false
//! timeout_secs = 60
//!
//! [logging]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};

use super::Config;

/// File name looked up in the working directory and the user config directory
const CONFIG_FILE_NAME: &str = "shelf-fetch.toml";

/// TOML reader/writer for [`Config`]
#[derive(Debug, Default)]
pub struct ConfigFile {
    pub config: Config,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        let config = toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))?;
        Ok(Self { config })
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Render the configuration as pretty TOML
    pub fn to_toml(&self) -> Result<String, ConfigFileError> {
        toml::to_string_pretty(&self.config).map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }
}

/// Find a configuration file in the default locations
///
/// Checks `./shelf-fetch.toml` first, then `<config dir>/shelf-fetch/shelf-fetch.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("shelf-fetch").join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_config_file_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
[preferences]
languages = "French, English"
formats = "pdf, epub"
delimiter = ";"

[downloads]
default_path = "/tmp/downloads"
ignore_tls = true
timeout_secs = 15

[logging]
level = "debug"
"#;

        let mut file = File::create(&path).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let loaded = ConfigFile::load(&path).unwrap().config;

        assert_eq!(loaded.preferences.languages, "French, English");
        assert_eq!(loaded.preferences.formats, "pdf, epub");
        assert_eq!(loaded.preferences.delimiter, ";");
        assert_eq!(
            loaded.downloads.default_path,
            Some(PathBuf::from("/tmp/downloads"))
        );
        assert!(loaded.downloads.ignore_tls);
        assert_eq!(loaded.downloads.timeout_secs, 15);
        assert_eq!(loaded.logging.level, "debug");
    }

    #[test]
    fn test_config_file_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut file = ConfigFile::default();
        file.config.preferences.languages = "German".to_string();
        file.config.downloads.ignore_tls = true;

        file.save(&path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap().config;
        assert_eq!(loaded.preferences.languages, "German");
        assert!(loaded.downloads.ignore_tls);
        assert_eq!(loaded, file.config);
    }

    #[test]
    fn test_partial_file_gains_defaults_on_resave() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[downloads]\nignore_tls = true\n").unwrap();

        ConfigFile::load(&path).unwrap().save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[preferences]"));
        assert!(content.contains("timeout_secs = 60"));

        let loaded = ConfigFile::load(&path).unwrap().config;
        assert!(loaded.downloads.ignore_tls);
        assert_eq!(loaded.preferences, Config::default().preferences);
    }

    #[test]
    fn test_config_file_nonexistent() {
        let path = PathBuf::from("/nonexistent/config.toml");
        let result = ConfigFile::load(&path);
        assert!(matches!(result, Err(ConfigFileError::Io(_))));
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");

        std::fs::write(&path, "invalid = toml = content").unwrap();

        let result = ConfigFile::load(&path);
        assert!(matches!(result, Err(ConfigFileError::Parse(_))));
    }
}
