#![allow(dead_code, unused_imports)]
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

pub use sqlsh::config::{ShellConfig, Variables};
pub use sqlsh::executor::{BackendError, ObjectSpec, QueryCanceller, QueryExecutor};
pub use sqlsh::results::{ResultBundle, ResultSet};
pub use sqlsh::session::{Flow, ScriptReader, Session};
pub use tempfile::TempDir;

/// Writer whose bytes stay readable after the session takes ownership
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Counts cancel requests
#[derive(Default)]
pub struct CountingCanceller {
    calls: AtomicUsize,
}

impl CountingCanceller {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QueryCanceller for CountingCanceller {
    fn cancel(&self) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Everything the fake executor was asked to do, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Execute { sql: String, params: Vec<String> },
    Catalogs,
    Schemas,
    Tables(ObjectSpec),
    Columns(ObjectSpec),
    Info,
    Reconnect(Option<String>),
}

type Hook = Box<dyn FnMut()>;

/// Recording executor with scripted responses
pub struct FakeExecutor {
    pub calls: Vec<Call>,
    responses: VecDeque<Result<ResultBundle, BackendError>>,
    canceller: Arc<CountingCanceller>,
    on_execute: Option<Hook>,
    fail_reconnect: bool,
    name: String,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            responses: VecDeque::new(),
            canceller: Arc::new(CountingCanceller::default()),
            on_execute: None,
            fail_reconnect: false,
            name: "fake".to_string(),
        }
    }

    /// Queue the result of the next `execute`
    pub fn respond(mut self, response: Result<ResultBundle, BackendError>) -> Self {
        self.responses.push_back(response);
        self
    }

    /// Run `hook` while `execute` is in flight
    pub fn on_execute(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_execute = Some(Box::new(hook));
        self
    }

    pub fn failing_reconnect(mut self) -> Self {
        self.fail_reconnect = true;
        self
    }

    pub fn canceller_handle(&self) -> Arc<CountingCanceller> {
        Arc::clone(&self.canceller)
    }

    pub fn executed(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Execute { sql, .. } => Some(sql.clone()),
                _ => None,
            })
            .collect()
    }
}

/// One-column, one-row result like `SELECT 1`
pub fn single_value(column: &str, value: &str) -> ResultBundle {
    let mut set = ResultSet::with_columns([column]);
    set.push_values([Some(value)]).unwrap();
    ResultBundle::single(set)
}

impl QueryExecutor for FakeExecutor {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn canceller(&self) -> Arc<dyn QueryCanceller> {
        self.canceller.clone()
    }

    fn execute(&mut self, sql: &str, params: &[String]) -> Result<ResultBundle, BackendError> {
        self.calls.push(Call::Execute {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        if let Some(hook) = self.on_execute.as_mut() {
            hook();
        }
        self.responses
            .pop_front()
            .unwrap_or_else(|| Ok(ResultBundle::single(ResultSet::success())))
    }

    fn list_catalogs(&mut self) -> Result<ResultBundle, BackendError> {
        self.calls.push(Call::Catalogs);
        Ok(single_value("catalog", "main"))
    }

    fn list_schemas(&mut self) -> Result<ResultBundle, BackendError> {
        self.calls.push(Call::Schemas);
        Ok(single_value("schema", "public"))
    }

    fn list_tables(&mut self, spec: &ObjectSpec) -> Result<ResultBundle, BackendError> {
        self.calls.push(Call::Tables(spec.clone()));
        Ok(single_value("name", "users"))
    }

    fn list_columns(&mut self, spec: &ObjectSpec) -> Result<ResultBundle, BackendError> {
        self.calls.push(Call::Columns(spec.clone()));
        Ok(single_value("column", "id"))
    }

    fn connection_info(&mut self) -> Result<ResultBundle, BackendError> {
        self.calls.push(Call::Info);
        Ok(ResultBundle::single(ResultSet::name_value([(
            "database",
            Some(self.name.clone()),
        )])))
    }

    fn reconnect(&mut self, credential: Option<&str>) -> Result<(), BackendError> {
        self.calls.push(Call::Reconnect(credential.map(str::to_string)));
        if self.fail_reconnect {
            return Err(BackendError::message("unable to open database file"));
        }
        if let Some(name) = credential {
            self.name = name.to_string();
        }
        Ok(())
    }
}

/// Variables with built-in defaults only: no environment, no colour
pub fn test_variables() -> Variables {
    let mut vars = Variables::with_env(ShellConfig::default(), |_| None);
    vars.set("color", "false");
    vars
}

pub struct Harness<E: QueryExecutor> {
    pub session: Session<E>,
    pub out: SharedBuffer,
    pub err: SharedBuffer,
}

impl<E: QueryExecutor> Harness<E> {
    pub fn new(executor: E) -> Self {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let session = Session::new(executor, test_variables())
            .with_output(Box::new(out.clone()), Box::new(err.clone()));
        Self { session, out, err }
    }

    /// Feed lines through the main loop
    pub fn run(&mut self, lines: &[&str]) -> (Flow, ScriptReader) {
        let mut reader = ScriptReader::from_lines(lines.iter().copied());
        let flow = self.session.run(&mut reader).unwrap();
        (flow, reader)
    }

    pub fn output(&self) -> String {
        self.out.contents()
    }

    pub fn errors(&self) -> String {
        self.err.contents()
    }
}
