//! Editor configuration
//!
//! A JSON file; every field is optional:
//!
//! ```json
//! {
//!   "document_path": "BGMI.html",
//!   "backup_path": "BGMI.html.bak",
//!   "autosave_delay_ms": 2000,
//!   "sort_column": "#",
//!   "sort_descending": false
//! }
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sort::{SortColumn, SortDirection, SortState};

/// Configuration failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("invalid config JSON in {path}: {reason}")]
    InvalidJson { path: String, reason: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Editor settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Standings document (default `BGMI.html`)
    #[serde(default = "default_document_path")]
    pub document_path: PathBuf,

    /// Backup copy; defaults to `<document_path>.bak`
    #[serde(default)]
    pub backup_path: Option<PathBuf>,

    /// Idle delay before an auto-save, in milliseconds
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,

    /// Initial sort column label
    #[serde(default = "default_sort_column")]
    pub sort_column: SortColumn,

    /// Initial sort direction
    #[serde(default)]
    pub sort_descending: bool,
}

fn default_document_path() -> PathBuf {
    PathBuf::from("BGMI.html")
}
fn default_autosave_delay_ms() -> u64 {
    2000
}
fn default_sort_column() -> SortColumn {
    SortColumn::Rank
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            document_path: default_document_path(),
            backup_path: None,
            autosave_delay_ms: default_autosave_delay_ms(),
            sort_column: default_sort_column(),
            sort_descending: false,
        }
    }
}

impl EditorConfig {
    /// Defaults pointed at `document_path`.
    pub fn for_document(document_path: impl Into<PathBuf>) -> Self {
        Self {
            document_path: document_path.into(),
            ..Self::default()
        }
    }

    /// Loads and validates a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    /// Like [`EditorConfig::load`], but a missing file yields defaults.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(path, &content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Unreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn parse(path: &Path, content: &str) -> ConfigResult<Self> {
        let config: EditorConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::InvalidJson {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Checks field ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.document_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("document_path must not be empty".into()));
        }

        if self.autosave_delay_ms == 0 {
            return Err(ConfigError::Invalid("autosave_delay_ms must be > 0".into()));
        }

        if self.backup_path() == self.document_path {
            return Err(ConfigError::Invalid(
                "backup_path must differ from document_path".into(),
            ));
        }

        Ok(())
    }

    /// Backup location, explicit or `<document_path>.bak`.
    pub fn backup_path(&self) -> PathBuf {
        match &self.backup_path {
            Some(path) => path.clone(),
            None => {
                let mut name = self.document_path.clone().into_os_string();
                name.push(".bak");
                PathBuf::from(name)
            }
        }
    }

    pub fn idle_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    pub fn sort_state(&self) -> SortState {
        SortState::new(
            self.sort_column,
            SortDirection::from_descending(self.sort_descending),
        )
    }
}
