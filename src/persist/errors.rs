//! Save error types
//!
//! Error codes:
//! - STANDINGS_SAVE_NO_DOCUMENT (ERROR)
//! - STANDINGS_SAVE_WRITE_FAILED (ERROR)
//!
//! A save error never rolls back the row store and never damages the
//! previous document: the write replaces the file only after the new
//! content is fully on disk. A backup failure is not an error; it is
//! reported through [`BackupOutcome`](super::BackupOutcome) and the save
//! proceeds.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::observability::Severity;

/// Save failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("HTML structure missing, cannot save")]
    NoDocument,

    #[error("error saving {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}

impl SaveError {
    /// Creates a write failure for `path`
    pub fn write_failed(path: &Path, context: &str, source: &io::Error) -> Self {
        SaveError::WriteFailed {
            path: path.display().to_string(),
            reason: format!("{}: {}", context, source),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SaveError::NoDocument => "STANDINGS_SAVE_NO_DOCUMENT",
            SaveError::WriteFailed { .. } => "STANDINGS_SAVE_WRITE_FAILED",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

/// Result type for save operations
pub type SaveResult<T> = Result<T, SaveError>;
