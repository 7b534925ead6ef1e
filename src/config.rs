//! Runtime configuration loaded from TOML.

use std::path::{Path, PathBuf};

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::channel::DEFAULT_CHANNEL_FILE;

/// Where the adventure data lives.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AdventureConfig {
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    database_path: PathBuf,

    /// File holding the adventure channel identifier.
    #[serde(default = "default_channel_file")]
    channel_file: PathBuf,
}

#[instrument]
fn default_database_path() -> PathBuf {
    PathBuf::from("adventure.db")
}

#[instrument]
fn default_channel_file() -> PathBuf {
    PathBuf::from(DEFAULT_CHANNEL_FILE)
}

impl Default for AdventureConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            channel_file: default_channel_file(),
        }
    }
}

impl AdventureConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(database = %config.database_path.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Replaces paths with any override that is present.
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        database_path: Option<PathBuf>,
        channel_file: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = database_path {
            self.database_path = path;
        }
        if let Some(path) = channel_file {
            self.channel_file = path;
        }
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = AdventureConfig::from_toml("").expect("Parse failed");
        assert_eq!(config, AdventureConfig::default());
        assert_eq!(config.channel_file(), Path::new("current_channel.txt"));
    }

    #[test]
    fn toml_sets_paths() {
        let config = AdventureConfig::from_toml(
            "database_path = \"/var/lib/bot/rpg.db\"\nchannel_file = \"chan.txt\"\n",
        )
        .expect("Parse failed");
        assert_eq!(config.database_path(), Path::new("/var/lib/bot/rpg.db"));
        assert_eq!(config.channel_file(), Path::new("chan.txt"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(AdventureConfig::from_toml("database_path = [").is_err());
    }

    #[test]
    fn overrides_only_replace_given_paths() {
        let config = AdventureConfig::default().with_overrides(Some("other.db".into()), None);
        assert_eq!(config.database_path(), Path::new("other.db"));
        assert_eq!(config.channel_file(), Path::new(DEFAULT_CHANNEL_FILE));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let err = AdventureConfig::from_file(dir.path().join("nope.toml")).unwrap_err();
        assert!(err.message.contains("Failed to read config file"));
    }
}
