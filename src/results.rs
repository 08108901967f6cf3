//! Result model
//!
//! What a query executor hands back for one submitted statement text: an
//! ordered list of result sets plus the warnings raised while producing
//! them. The model is rendering-agnostic and is dropped as soon as it has
//! been rendered.

use std::convert::Infallible;
use std::time::Duration;

use thiserror::Error;

/// Row-count sentinel for statements with no row concept (DDL, PRAGMA, ...)
pub const NO_ROW_COUNT: i64 = -1;

/// Initial transfer buffer size used when capturing cell values
pub const INITIAL_TRANSFER_SIZE: usize = 256;

/// A single value. `None` is SQL NULL, which is distinct from `Some("")`.
pub type Cell = Option<String>;

/// Raised when a row does not have one cell per column.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("row has {actual} cells but the result set has {expected} columns")]
pub struct ArityMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// One row of a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    /// Build a row from an ordered sequence of optional values
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            cells: values.into_iter().map(|v| v.map(Into::into)).collect(),
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).and_then(|c| c.as_deref())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Output of one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Row>,
    row_count: i64,
    elapsed: Duration,
}

impl ResultSet {
    /// Data result with the given column names and no rows yet
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            row_count: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Non-data statement that affected `count` rows
    pub fn affected(count: i64) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            row_count: count,
            elapsed: Duration::ZERO,
        }
    }

    /// Statement that succeeded without any row concept
    pub fn success() -> Self {
        Self::affected(NO_ROW_COUNT)
    }

    /// Two-column `name | value` result, used by info and `set`
    pub fn name_value<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::with_columns(["name", "value"]);
        for (name, value) in pairs {
            set.rows.push(Row {
                cells: vec![Some(name.into()), value.map(Into::into)],
            });
        }
        set.row_count = set.rows.len() as i64;
        set
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    /// Append a row, enforcing one cell per column
    pub fn push_row(&mut self, row: Row) -> Result<(), ArityMismatch> {
        if row.len() != self.columns.len() {
            return Err(ArityMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        self.row_count = self.rows.len() as i64;
        Ok(())
    }

    /// Convenience for `push_row(Row::from_values(values))`
    pub fn push_values<I, S>(&mut self, values: I) -> Result<(), ArityMismatch>
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        self.push_row(Row::from_values(values))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows, affected rows, or [`NO_ROW_COUNT`]
    pub fn row_count(&self) -> i64 {
        self.row_count
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Zero columns means a non-data statement
    pub fn is_data(&self) -> bool {
        !self.columns.is_empty()
    }
}

/// Everything produced by one execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultBundle {
    sets: Vec<ResultSet>,
    warnings: Vec<String>,
}

impl ResultBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(set: ResultSet) -> Self {
        Self {
            sets: vec![set],
            warnings: Vec::new(),
        }
    }

    pub fn push_set(&mut self, set: ResultSet) {
        self.sets.push(set);
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.push_warning(warning);
        self
    }

    pub fn sets(&self) -> &[ResultSet] {
        &self.sets
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Outcome of one request for a cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// The value is SQL NULL
    Null,
    /// The whole value fit; this many bytes were written
    Complete(usize),
    /// The buffer was too small; `total` is the full length when known
    Truncated { total: Option<usize> },
}

/// A backend value that is read through a caller-supplied transfer buffer.
///
/// Each `fetch` writes the value from its beginning.
pub trait CellSource {
    type Error;

    fn fetch(&mut self, buf: &mut [u8]) -> Result<Fetch, Self::Error>;
}

/// Read a full cell value, growing the transfer buffer and re-requesting
/// whenever the source reports truncation.
pub fn capture_cell<S: CellSource>(source: &mut S, initial: usize) -> Result<Cell, S::Error> {
    let mut buf = vec![0u8; initial.max(1)];
    loop {
        match source.fetch(&mut buf)? {
            Fetch::Null => return Ok(None),
            Fetch::Complete(len) => {
                buf.truncate(len);
                let text = match String::from_utf8(buf) {
                    Ok(text) => text,
                    Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
                };
                return Ok(Some(text));
            }
            Fetch::Truncated { total } => {
                let grown = match total {
                    Some(total) if total > buf.len() => total,
                    _ => buf.len() * 2,
                };
                buf.resize(grown, 0);
            }
        }
    }
}

/// In-memory value exposed through the fetch protocol.
#[derive(Debug, Clone, Copy)]
pub struct BytesSource<'a> {
    value: Option<&'a [u8]>,
}

impl<'a> BytesSource<'a> {
    pub fn new(value: Option<&'a [u8]>) -> Self {
        Self { value }
    }
}

impl CellSource for BytesSource<'_> {
    type Error = Infallible;

    fn fetch(&mut self, buf: &mut [u8]) -> Result<Fetch, Infallible> {
        let Some(value) = self.value else {
            return Ok(Fetch::Null);
        };
        if value.len() > buf.len() {
            buf.copy_from_slice(&value[..buf.len()]);
            return Ok(Fetch::Truncated {
                total: Some(value.len()),
            });
        }
        buf[..value.len()].copy_from_slice(value);
        Ok(Fetch::Complete(value.len()))
    }
}
