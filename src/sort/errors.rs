//! Sort error types
//!
//! Error codes:
//! - STANDINGS_SORT_UNKNOWN_COLUMN
//! - STANDINGS_SORT_NON_NUMERIC
//!
//! Both are contract violations: the table view only offers known columns,
//! and the row store only holds numeric ranks and points.

use thiserror::Error;

use super::sorter::SortColumn;

use crate::observability::Severity;

/// Sort failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    #[error("unknown sort column: '{0}'")]
    UnknownColumn(String),

    #[error("cannot sort column '{column}': '{value}' is not a number")]
    NonNumericValue { column: SortColumn, value: String },
}

impl SortError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SortError::UnknownColumn(_) => "STANDINGS_SORT_UNKNOWN_COLUMN",
            SortError::NonNumericValue { .. } => "STANDINGS_SORT_NON_NUMERIC",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

/// Result type for sort operations
pub type SortResult<T> = Result<T, SortError>;
