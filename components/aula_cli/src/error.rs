//! Error types for the CLI

use std::fmt;

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// File I/O error
    IoError(std::io::Error),

    /// JSON serialization error
    JsonError(serde_json::Error),

    /// REPL error
    ReplError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::IoError(e) => write!(f, "File error: {}", e),
            CliError::JsonError(e) => write!(f, "JSON error: {}", e),
            CliError::ReplError(s) => write!(f, "REPL error: {}", s),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::IoError(e) => Some(e),
            CliError::JsonError(e) => Some(e),
            CliError::ReplError(_) => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::JsonError(err)
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
