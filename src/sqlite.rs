//! SQLite query executor
//!
//! Runs statement text against a SQLite database with rusqlite. Every
//! statement in the text becomes one result set; cell values go through the
//! buffered capture loop in [`crate::results`]. Cancellation uses SQLite's
//! thread-safe interrupt handle.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
use rusqlite::types::ValueRef;
use rusqlite::{Batch, Connection, InterruptHandle, Statement};

use crate::executor::{BackendError, ObjectSpec, QueryCanceller, QueryExecutor};
use crate::results::{capture_cell, BytesSource, Cell, ResultBundle, ResultSet, INITIAL_TRANSFER_SIZE};

/// Literal parameter token bound as SQL NULL
pub const NULL_PARAM: &str = "NULL";

/// Statements whose row count is an affected-row count. A `WITH` prefix
/// only reaches the no-columns path when it ends in one of the others.
const DML_KEYWORDS: &[&str] = &["INSERT", "UPDATE", "DELETE", "REPLACE", "WITH"];

impl From<rusqlite::Error> for BackendError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, Some(msg)) => BackendError::new(vec![
                msg.clone(),
                format!("SQLite error {} ({:?})", code.extended_code, code.code),
            ]),
            _ => BackendError::message(err.to_string()),
        }
    }
}

struct SqliteCanceller {
    handle: InterruptHandle,
}

impl QueryCanceller for SqliteCanceller {
    fn cancel(&self) -> Result<(), BackendError> {
        self.handle.interrupt();
        Ok(())
    }
}

/// Escape a SQL identifier by doubling quotes
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Text form of a SQLite value, before it is captured into a cell
fn value_bytes(value: ValueRef<'_>) -> Option<Cow<'_, [u8]>> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(Cow::Owned(i.to_string().into_bytes())),
        ValueRef::Real(f) => Some(Cow::Owned(format!("{:?}", f).into_bytes())),
        ValueRef::Text(t) => Some(Cow::Borrowed(t)),
        ValueRef::Blob(b) => {
            let mut hex = String::with_capacity(b.len() * 2 + 3);
            hex.push_str("X'");
            for byte in b {
                let _ = write!(hex, "{:02X}", byte);
            }
            hex.push('\'');
            Some(Cow::Owned(hex.into_bytes()))
        }
    }
}

fn capture(value: ValueRef<'_>) -> Cell {
    let bytes = value_bytes(value);
    let mut source = BytesSource::new(bytes.as_deref());
    match capture_cell(&mut source, INITIAL_TRANSFER_SIZE) {
        Ok(cell) => cell,
        Err(never) => match never {},
    }
}

/// First keyword of a statement after any leading comments, upper-cased
fn leading_keyword(sql: &str) -> String {
    let mut rest = sql;
    loop {
        rest = rest.trim_start();
        if let Some(comment) = rest.strip_prefix("--") {
            rest = comment.split_once('\n').map(|(_, tail)| tail).unwrap_or("");
        } else if let Some(comment) = rest.strip_prefix("/*") {
            rest = comment.split_once("*/").map(|(_, tail)| tail).unwrap_or("");
        } else {
            break;
        }
    }
    rest.split(|c: char| !c.is_ascii_alphabetic())
        .next()
        .unwrap_or("")
        .to_ascii_uppercase()
}

/// [`QueryExecutor`] over one SQLite connection.
pub struct SqliteExecutor {
    path: String,
    conn: Connection,
    canceller: Arc<SqliteCanceller>,
}

impl SqliteExecutor {
    /// Open `path`; `:memory:` gives a private in-memory database
    pub fn open(path: &str) -> Result<Self, BackendError> {
        let conn = Connection::open(path)?;
        let canceller = Arc::new(SqliteCanceller {
            handle: conn.get_interrupt_handle(),
        });
        info!("[SQLSH_EXEC] Opened SQLite database {}", path);
        Ok(Self {
            path: path.to_string(),
            conn,
            canceller,
        })
    }

    /// Bind as many parameters as the statement has placeholders
    fn bind(stmt: &mut Statement<'_>, params: &[String]) -> Result<(), BackendError> {
        let count = stmt.parameter_count();
        if params.len() > count {
            debug!(
                "[SQLSH_EXEC] Ignoring {} extra parameter(s)",
                params.len() - count
            );
        }
        for (idx, param) in params.iter().take(count).enumerate() {
            let value = if param == NULL_PARAM {
                None
            } else {
                Some(param.as_str())
            };
            stmt.raw_bind_parameter(idx + 1, value)?;
        }
        Ok(())
    }

    /// Step one prepared statement to completion
    fn run_statement(stmt: &mut Statement<'_>, params: &[String]) -> Result<ResultSet, BackendError> {
        let started = Instant::now();
        Self::bind(stmt, params)?;

        if stmt.column_count() == 0 {
            let keyword = leading_keyword(&stmt.expanded_sql().unwrap_or_default());
            let changed = stmt.raw_execute()?;
            let set = if DML_KEYWORDS.contains(&keyword.as_str()) {
                ResultSet::affected(changed as i64)
            } else {
                ResultSet::success()
            };
            return Ok(set.with_elapsed(started.elapsed()));
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();
        let mut set = ResultSet::with_columns(columns);
        let mut rows = stmt.raw_query();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for idx in 0..width {
                cells.push(capture(row.get_ref(idx)?));
            }
            set.push_values(cells)?;
        }
        set.set_elapsed(started.elapsed());
        Ok(set)
    }

    /// Run a metadata query into a result set with the given headings
    fn query_set(&self, sql: &str, params: &[&str], columns: &[&str]) -> Result<ResultSet, BackendError> {
        let started = Instant::now();
        let mut stmt = self.conn.prepare(sql)?;
        for (idx, param) in params.iter().enumerate() {
            stmt.raw_bind_parameter(idx + 1, *param)?;
        }
        let mut set = ResultSet::with_columns(columns.iter().copied());
        let mut rows = stmt.raw_query();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                cells.push(capture(row.get_ref(idx)?));
            }
            set.push_values(cells)?;
        }
        Ok(set.with_elapsed(started.elapsed()))
    }

    fn catalog_names(&self) -> Result<Vec<String>, BackendError> {
        let mut stmt = self.conn.prepare("SELECT name FROM pragma_database_list ORDER BY seq")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}

impl QueryExecutor for SqliteExecutor {
    fn display_name(&self) -> String {
        if self.path == ":memory:" || self.path.is_empty() {
            return self.path.clone();
        }
        Path::new(&self.path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.clone())
    }

    fn canceller(&self) -> Arc<dyn QueryCanceller> {
        self.canceller.clone()
    }

    fn execute(&mut self, sql: &str, params: &[String]) -> Result<ResultBundle, BackendError> {
        debug!("[SQLSH_EXEC] Executing: {}", sql);
        let mut bundle = ResultBundle::new();
        let mut batch = Batch::new(&self.conn, sql);
        while let Some(mut stmt) = batch.next()? {
            bundle.push_set(Self::run_statement(&mut stmt, params)?);
        }
        if bundle.is_empty() {
            bundle.push_set(ResultSet::success());
        }
        Ok(bundle)
    }

    fn list_catalogs(&mut self) -> Result<ResultBundle, BackendError> {
        let set = self.query_set(
            "SELECT name, NULLIF(file, '') FROM pragma_database_list ORDER BY seq",
            &[],
            &["catalog", "file"],
        )?;
        Ok(ResultBundle::single(set))
    }

    fn list_schemas(&mut self) -> Result<ResultBundle, BackendError> {
        let set = self.query_set(
            "SELECT name, NULL FROM pragma_database_list ORDER BY seq",
            &[],
            &["catalog", "schema"],
        )?;
        Ok(ResultBundle::single(set))
    }

    fn list_tables(&mut self, spec: &ObjectSpec) -> Result<ResultBundle, BackendError> {
        let catalogs = match &spec.catalog {
            Some(catalog) => vec![catalog.clone()],
            None => self.catalog_names()?,
        };
        let pattern = spec.name.as_deref().unwrap_or("%");

        let started = Instant::now();
        let mut set = ResultSet::with_columns(["catalog", "name", "type"]);
        for catalog in &catalogs {
            let sql = format!(
                "SELECT ?1, name, type FROM {}.sqlite_master \
                 WHERE type IN ('table', 'view') AND name LIKE ?2 ORDER BY name",
                quote_identifier(catalog)
            );
            let part = self.query_set(&sql, &[catalog.as_str(), pattern], &["catalog", "name", "type"])?;
            for row in part.rows() {
                set.push_row(row.clone())?;
            }
        }
        Ok(ResultBundle::single(set.with_elapsed(started.elapsed())))
    }

    fn list_columns(&mut self, spec: &ObjectSpec) -> Result<ResultBundle, BackendError> {
        let table = spec
            .name
            .as_deref()
            .ok_or_else(|| BackendError::message("Table name required"))?;
        let catalog = spec.catalog.as_deref().unwrap_or("main");
        let set = self.query_set(
            "SELECT name, type, CASE \"notnull\" WHEN 0 THEN 'YES' ELSE 'NO' END, dflt_value, \
             CASE pk WHEN 0 THEN NULL ELSE pk END \
             FROM pragma_table_info(?1, ?2) ORDER BY cid",
            &[table, catalog],
            &["column", "type", "nullable", "default", "primary key"],
        )?;
        if set.rows().is_empty() {
            return Err(BackendError::message(format!("No such table: {}.{}", catalog, table)));
        }
        Ok(ResultBundle::single(set))
    }

    fn connection_info(&mut self) -> Result<ResultBundle, BackendError> {
        let file: Option<String> = self
            .conn
            .query_row(
                "SELECT NULLIF(file, '') FROM pragma_database_list WHERE name = 'main'",
                [],
                |row| row.get(0),
            )?;
        let set = ResultSet::name_value([
            ("database", Some(self.path.clone())),
            ("file", file),
            ("sqlite version", Some(rusqlite::version().to_string())),
            ("autocommit", Some(self.conn.is_autocommit().to_string())),
        ]);
        Ok(ResultBundle::single(set))
    }

    fn reconnect(&mut self, credential: Option<&str>) -> Result<(), BackendError> {
        let path = credential.unwrap_or(&self.path).to_string();
        let fresh = Self::open(&path)?;
        info!("[SQLSH_EXEC] Reconnected to {}", path);
        *self = fresh;
        Ok(())
    }
}
