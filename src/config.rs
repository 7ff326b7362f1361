//! Configuration management for keepcore.
//!
//! This module handles loading and saving application configuration to/from
//! a JSON file. The config directory is caller-supplied, so the CLI shell
//! can put it wherever its platform conventions say.
//!
//! The config carries the run options (output directory, date format, the
//! rename/delete opt-ins) plus the saved master token that lets repeat runs
//! skip the password login.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::KeepResult;
use crate::reconcile::SyncOptions;

fn default_directory() -> String {
    "./gkeep-export".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_true() -> bool {
    true
}

/// Date format preset used by the ISO-8601 switch.
pub const ISO8601_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigData {
    /// Google account email
    #[serde(default)]
    pub user: String,
    /// Saved master token from a prior login (avoids re-logging in)
    #[serde(default)]
    pub token: Option<String>,
    /// Output directory for exported notes
    #[serde(default = "default_directory")]
    pub directory: String,
    /// strftime format prefixed to note filenames (created date)
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Include the frontmatter header in note files
    #[serde(default = "default_true")]
    pub header: bool,
    /// Rename local files whose canonical name changed
    #[serde(default)]
    pub rename_local: bool,
    /// Delete local notes/media absent from the remote snapshot
    #[serde(default)]
    pub delete_local: bool,
    /// Skip media downloads that appear unchanged locally
    #[serde(default = "default_true")]
    pub skip_existing_media: bool,
}

impl Default for ConfigData {
    fn default() -> Self {
        Self {
            user: String::new(),
            token: None,
            directory: default_directory(),
            date_format: default_date_format(),
            header: true,
            rename_local: false,
            delete_local: false,
            skip_existing_media: true,
        }
    }
}

impl ConfigData {
    /// The run options the reconciliation driver needs.
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            notes_dir: PathBuf::from(&self.directory),
            date_format: self.date_format.clone(),
            header: self.header,
            rename_local: self.rename_local,
            delete_local: self.delete_local,
            skip_existing_media: self.skip_existing_media,
        }
    }
}

/// Configuration manager
pub struct Config {
    config_dir: PathBuf,
    config_file: PathBuf,
    data: ConfigData,
}

impl Config {
    /// Create a new configuration manager rooted at `config_dir`.
    ///
    /// Loads the existing config file when present; otherwise writes the
    /// defaults so the user has a file to edit. An unreadable or malformed
    /// file falls back to defaults rather than blocking the run.
    pub fn new(config_dir: PathBuf) -> KeepResult<Self> {
        fs::create_dir_all(&config_dir)?;
        let config_file = config_dir.join("config.json");

        let data = if config_file.exists() {
            match fs::read_to_string(&config_file) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    tracing::warn!(path = %config_file.display(), error = %e, "malformed config file, using defaults");
                    ConfigData::default()
                }),
                Err(_) => ConfigData::default(),
            }
        } else {
            ConfigData::default()
        };

        let config = Self {
            config_dir,
            config_file,
            data,
        };

        if !config.config_file.exists() {
            config.save()?;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> KeepResult<()> {
        let content = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.config_file, content)?;
        Ok(())
    }

    /// Get the configuration directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data(&self) -> &ConfigData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ConfigData {
        &mut self.data
    }

    /// Get the saved master token, if any
    pub fn token(&self) -> Option<&str> {
        self.data.token.as_deref()
    }

    /// Persist a master token obtained from a successful login.
    ///
    /// A no-op when the stored token is already the same.
    pub fn set_token(&mut self, token: &str) -> KeepResult<()> {
        if self.data.token.as_deref() == Some(token) {
            return Ok(());
        }
        self.data.token = Some(token.to_string());
        self.save()
    }

    /// Switch the filename date format to the ISO-8601 preset.
    pub fn use_iso8601_dates(&mut self) -> KeepResult<()> {
        self.data.date_format = ISO8601_DATE_FORMAT.to_string();
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_written_on_first_run() {
        let tmp = TempDir::new().unwrap();
        let config = Config::new(tmp.path().to_path_buf()).unwrap();

        assert!(tmp.path().join("config.json").exists());
        assert_eq!(config.data().directory, "./gkeep-export");
        assert_eq!(config.data().date_format, "%Y-%m-%d");
        assert!(config.data().header);
        assert!(config.data().skip_existing_media);
        assert!(!config.data().rename_local);
        assert!(!config.data().delete_local);
        assert!(config.token().is_none());
    }

    #[test]
    fn test_token_roundtrip() {
        let tmp = TempDir::new().unwrap();
        {
            let mut config = Config::new(tmp.path().to_path_buf()).unwrap();
            config.set_token("aas_et/master-token").unwrap();
        }
        let config = Config::new(tmp.path().to_path_buf()).unwrap();
        assert_eq!(config.token(), Some("aas_et/master-token"));
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.json"), "{not json").unwrap();
        let config = Config::new(tmp.path().to_path_buf()).unwrap();
        assert_eq!(config.data().date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_partial_config_uses_serde_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.json"),
            "{\"user\": \"me@example.com\", \"rename_local\": true}",
        )
        .unwrap();
        let config = Config::new(tmp.path().to_path_buf()).unwrap();
        assert_eq!(config.data().user, "me@example.com");
        assert!(config.data().rename_local);
        assert!(config.data().header);
    }

    #[test]
    fn test_sync_options_mapping() {
        let data = ConfigData {
            directory: "/notes".to_string(),
            rename_local: true,
            ..Default::default()
        };
        let options = data.sync_options();
        assert_eq!(options.notes_dir, PathBuf::from("/notes"));
        assert!(options.rename_local);
        assert!(!options.delete_local);
    }

    #[test]
    fn test_iso8601_preset() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::new(tmp.path().to_path_buf()).unwrap();
        config.use_iso8601_dates().unwrap();
        assert_eq!(config.data().date_format, "%Y-%m-%dT%H:%M:%S");
    }
}
