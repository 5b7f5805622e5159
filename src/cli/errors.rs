//! CLI-specific error types
//!
//! Only setup failures are CLI errors. Once the editor is open, load,
//! validation and save problems are reported as notifications and the
//! session carries on.

use std::io;

use thiserror::Error;

use crate::codec::LoadError;
use crate::editor::ConfigError;
use crate::sort::SortError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file missing fields, malformed or invalid
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Terminal or runtime I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON output failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `show` could not read the document
    #[error("{0}")]
    Load(#[from] LoadError),

    /// `show` could not order the rows
    #[error("{0}")]
    Sort(#[from] SortError),
}

impl CliError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "STANDINGS_CLI_CONFIG_ERROR",
            CliError::Io(_) => "STANDINGS_CLI_IO_ERROR",
            CliError::Json(_) => "STANDINGS_CLI_JSON_ERROR",
            CliError::Load(e) => e.code(),
            CliError::Sort(e) => e.code(),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_codes_pass_through() {
        assert_eq!(CliError::from(LoadError::NoTable).code(), "STANDINGS_LOAD_NO_TABLE");
        assert_eq!(
            CliError::from(ConfigError::Invalid("x".into())).code(),
            "STANDINGS_CLI_CONFIG_ERROR"
        );
        assert_eq!(
            CliError::from(io::Error::new(io::ErrorKind::Other, "closed")).code(),
            "STANDINGS_CLI_IO_ERROR"
        );
    }
}
