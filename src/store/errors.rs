//! Validation error types
//!
//! A `ValidationError` rejects a user intent. The row store is left exactly
//! as it was and no save is requested.

use thiserror::Error;

use crate::observability::Severity;

/// Rejected intent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Team name cannot be empty!")]
    EmptyTeam,

    #[error("# must be a number! (got '{0}')")]
    NonNumericRank(String),

    #[error("Points must be a number! (got '{0}')")]
    NonNumericPoints(String),

    #[error("# {0} already exists!")]
    DuplicateRank(i64),

    #[error("# {0} not found")]
    NotFound(i64),

    #[error("Please select a row first!")]
    NoSelection,

    /// Holds the 0-based slot index; the message counts from 1.
    #[error("status slot {} does not exist (slots are 1-4)", .0 + 1)]
    InvalidSlot(usize),
}

impl ValidationError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyTeam => "STANDINGS_VALIDATION_EMPTY_TEAM",
            ValidationError::NonNumericRank(_) => "STANDINGS_VALIDATION_NON_NUMERIC_RANK",
            ValidationError::NonNumericPoints(_) => "STANDINGS_VALIDATION_NON_NUMERIC_POINTS",
            ValidationError::DuplicateRank(_) => "STANDINGS_VALIDATION_DUPLICATE_RANK",
            ValidationError::NotFound(_) => "STANDINGS_VALIDATION_NOT_FOUND",
            ValidationError::NoSelection => "STANDINGS_VALIDATION_NO_SELECTION",
            ValidationError::InvalidSlot(_) => "STANDINGS_VALIDATION_INVALID_SLOT",
        }
    }

    /// Rejections are user-facing errors; the store is unchanged.
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

/// Result type for row store operations
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(ValidationError::DuplicateRank(1).to_string(), "# 1 already exists!");
        assert_eq!(ValidationError::EmptyTeam.to_string(), "Team name cannot be empty!");
        assert!(ValidationError::NonNumericRank("x".into())
            .to_string()
            .contains("'x'"));
        assert_eq!(
            ValidationError::InvalidSlot(4).to_string(),
            "status slot 5 does not exist (slots are 1-4)"
        );
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            ValidationError::EmptyTeam.code(),
            ValidationError::NonNumericRank(String::new()).code(),
            ValidationError::NonNumericPoints(String::new()).code(),
            ValidationError::DuplicateRank(0).code(),
            ValidationError::NotFound(0).code(),
            ValidationError::NoSelection.code(),
            ValidationError::InvalidSlot(0).code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
