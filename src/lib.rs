//! Library entry point for sqlsh components.
//!
//! Exposes the shell core (segmenter, dispatcher, render engine) and the
//! SQLite executor so integration tests can drive a session without going
//! through the binary entry point.

pub mod actions;
pub mod buffer;
pub mod cancel;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod executor;
pub mod formatter;
pub mod history;
pub mod logging;
pub mod parser;
pub mod prompt;
pub mod results;
pub mod segmenter;
pub mod session;
pub mod sink;
pub mod sqlite;

pub use config::{CliConfiguration, Variables};
pub use error::{Result, ShellError};
pub use executor::{BackendError, QueryExecutor};
pub use formatter::{OutputFormat, OutputFormatter};
pub use session::{Flow, Session};
pub use sqlite::SqliteExecutor;
