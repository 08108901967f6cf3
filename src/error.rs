//! Error types for sqlsh
//!
//! Every failure the shell can hit is folded into [`ShellError`]. Only
//! allocation failure is fatal; everything else is reported on the error
//! stream and the session carries on.

use thiserror::Error;

use crate::executor::BackendError;

/// Result type for shell operations
pub type Result<T> = std::result::Result<T, ShellError>;

/// Errors that can occur in the shell
#[derive(Error, Debug)]
pub enum ShellError {
    /// Configuration file or variable error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// File I/O error
    #[error("File error: {0}")]
    File(String),

    /// Output destination could not be opened or written
    #[error("Output error: {0}")]
    Sink(String),

    /// External editor could not be run or its file could not be reloaded
    #[error("Editor error: {0}")]
    Editor(String),

    /// Diagnostics reported by the query executor
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Line editor error
    #[error("Input error: {0}")]
    Readline(String),

    /// History file error
    #[error("History error: {0}")]
    History(String),

    /// Command-mode text matched no known command
    #[error("Unrecognised command: {0}")]
    UnknownCommand(String),

    /// Command-mode prefix matched more than one command
    #[error("Ambiguous command '{prefix}' (could be {candidates})")]
    AmbiguousCommand { prefix: String, candidates: String },

    /// Command arguments were missing or malformed
    #[error("Usage: {0}")]
    Usage(String),
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::File(err.to_string())
    }
}

impl From<toml::de::Error> for ShellError {
    fn from(err: toml::de::Error) -> Self {
        ShellError::Configuration(format!("TOML parse error: {}", err))
    }
}
