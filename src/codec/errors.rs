//! Codec error types
//!
//! Error codes:
//! - STANDINGS_LOAD_NOT_FOUND (WARN)
//! - STANDINGS_LOAD_UNREADABLE (ERROR)
//! - STANDINGS_LOAD_NO_TABLE (ERROR)
//! - STANDINGS_LOAD_BAD_HEADER (ERROR)
//!
//! A `LoadError` is never fatal: the editor falls back to an empty document
//! skeleton. A `RowWarning` drops (or repairs) a single row and loading
//! continues.

use thiserror::Error;

use crate::observability::Severity;

/// Whole-document load failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("document not found: {path}")]
    NotFound { path: String },

    #[error("document unreadable: {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("document has no <table> element")]
    NoTable,

    #[error("expected table headers '#', 'Team', 'Points', 'Status'; found {found:?}")]
    BadHeader { found: Vec<String> },
}

impl LoadError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::NotFound { .. } => "STANDINGS_LOAD_NOT_FOUND",
            LoadError::Unreadable { .. } => "STANDINGS_LOAD_UNREADABLE",
            LoadError::NoTable => "STANDINGS_LOAD_NO_TABLE",
            LoadError::BadHeader { .. } => "STANDINGS_LOAD_BAD_HEADER",
        }
    }

    /// A missing file is expected on first run; everything else is an error.
    pub fn severity(&self) -> Severity {
        match self {
            LoadError::NotFound { .. } => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

/// Per-row anomaly found while decoding.
///
/// Row numbers are 1-based and count data rows after any header row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowWarning {
    #[error("row {0} has fewer than 4 columns; skipped")]
    TooFewColumns(usize),

    #[error("row {0} has a non-numeric # or Points value; skipped")]
    NonNumeric(usize),

    #[error("row {row} has status length {found}, expected 4; adjusted")]
    StatusLengthMismatch { row: usize, found: usize },

    #[error("row {row} repeats # {rank}; skipped")]
    DuplicateRank { row: usize, rank: i64 },

    #[error("row {0} has an empty team name; skipped")]
    EmptyTeam(usize),
}

impl RowWarning {
    /// Stable warning code
    pub fn code(&self) -> &'static str {
        match self {
            RowWarning::TooFewColumns(_) => "STANDINGS_ROW_TOO_FEW_COLUMNS",
            RowWarning::NonNumeric(_) => "STANDINGS_ROW_NON_NUMERIC",
            RowWarning::StatusLengthMismatch { .. } => "STANDINGS_ROW_STATUS_LENGTH",
            RowWarning::DuplicateRank { .. } => "STANDINGS_ROW_DUPLICATE_RANK",
            RowWarning::EmptyTeam(_) => "STANDINGS_ROW_EMPTY_TEAM",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Warn
    }

    /// The 1-based data row number the warning refers to.
    pub fn row(&self) -> usize {
        match self {
            RowWarning::TooFewColumns(row)
            | RowWarning::NonNumeric(row)
            | RowWarning::EmptyTeam(row) => *row,
            RowWarning::StatusLengthMismatch { row, .. } | RowWarning::DuplicateRank { row, .. } => {
                *row
            }
        }
    }

    /// Whether the row was dropped (as opposed to repaired and kept).
    pub fn is_skipped(&self) -> bool {
        !matches!(self, RowWarning::StatusLengthMismatch { .. })
    }
}

/// Result type for codec operations
pub type LoadResult<T> = Result<T, LoadError>;
