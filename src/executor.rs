//! Query executor boundary
//!
//! The shell core never talks to a database directly. Everything it needs
//! from a backend is expressed by [`QueryExecutor`]; cancellation goes
//! through a separate, thread-safe [`QueryCanceller`] so the interrupt
//! listener can act without touching the executor itself.

use std::sync::Arc;

use thiserror::Error;

use crate::results::{ArityMismatch, ResultBundle};

/// Diagnostics reported by the backend for a failed operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .diagnostics.join("\n"))]
pub struct BackendError {
    diagnostics: Vec<String>,
}

impl BackendError {
    pub fn new(diagnostics: Vec<String>) -> Self {
        Self { diagnostics }
    }

    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            diagnostics: vec![msg.into()],
        }
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }
}

impl From<ArityMismatch> for BackendError {
    fn from(err: ArityMismatch) -> Self {
        BackendError::message(err.to_string())
    }
}

/// Optional catalog qualifier plus an optional object name or pattern,
/// written `catalog.name` on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectSpec {
    pub catalog: Option<String>,
    pub name: Option<String>,
}

impl ObjectSpec {
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            None => Self::default(),
            Some(t) => match t.split_once('.') {
                Some((catalog, name)) => Self {
                    catalog: Some(catalog.to_string()).filter(|c| !c.is_empty()),
                    name: Some(name.to_string()).filter(|n| !n.is_empty()),
                },
                None => Self {
                    catalog: None,
                    name: Some(t.to_string()),
                },
            },
        }
    }
}

/// Aborts whatever the owning connection is currently executing.
pub trait QueryCanceller: Send + Sync {
    fn cancel(&self) -> Result<(), BackendError>;
}

/// Everything the shell asks of a database backend.
pub trait QueryExecutor {
    /// Short name of the current connection, used in the prompt
    fn display_name(&self) -> String;

    /// Cancellation handle for the current connection
    fn canceller(&self) -> Arc<dyn QueryCanceller>;

    /// Run statement text, binding `params` positionally
    fn execute(&mut self, sql: &str, params: &[String]) -> Result<ResultBundle, BackendError>;

    fn list_catalogs(&mut self) -> Result<ResultBundle, BackendError>;

    fn list_schemas(&mut self) -> Result<ResultBundle, BackendError>;

    fn list_tables(&mut self, spec: &ObjectSpec) -> Result<ResultBundle, BackendError>;

    fn list_columns(&mut self, spec: &ObjectSpec) -> Result<ResultBundle, BackendError>;

    fn connection_info(&mut self) -> Result<ResultBundle, BackendError>;

    /// Reconnect, optionally with a new credential. On failure the
    /// previous connection stays in use.
    fn reconnect(&mut self, credential: Option<&str>) -> Result<(), BackendError>;
}
