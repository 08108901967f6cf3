//! Interactive session management
//!
//! The main loop reads one line at a time, lets the segmenter split it into
//! statement text and an optional action, and hands actions to the
//! dispatcher. Everything runs on the calling thread; the only state shared
//! with the cancellation thread is the [`ActiveQueryHandle`].

mod commands;
mod dispatch;
mod reader;

use std::io::{self, Write};

use colored::Colorize;
use log::{debug, info, warn};

use crate::buffer::{BufferPair, INITIAL_BUFFER_SIZE};
use crate::cancel::ActiveQueryHandle;
use crate::config::Variables;
use crate::error::{Result, ShellError};
use crate::executor::QueryExecutor;
use crate::formatter::{OutputFormat, OutputFormatter};
use crate::history::CommandHistory;
use crate::parser::Tokenizer;
use crate::prompt::render_prompt;
use crate::segmenter::{DetectedAction, InputSegmenter, LineOutcome};

pub use commands::CommandOutput;
pub use reader::{LineReader, ReadOutcome, RustylineReader, ScriptReader};

/// Whether the main loop keeps going after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One shell session bound to one query executor.
pub struct Session<E: QueryExecutor> {
    executor: E,
    variables: Variables,
    buffers: BufferPair,
    segmenter: InputSegmenter,
    tokenizer: Tokenizer,
    active: ActiveQueryHandle,
    history: Option<CommandHistory>,
    last_history: Option<String>,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
}

impl<E: QueryExecutor> Session<E> {
    /// Create a session writing to stdout and stderr
    pub fn new(executor: E, variables: Variables) -> Self {
        Self {
            executor,
            variables,
            buffers: BufferPair::new(INITIAL_BUFFER_SIZE),
            segmenter: InputSegmenter::new(),
            tokenizer: Tokenizer::default(),
            active: ActiveQueryHandle::new(),
            history: None,
            last_history: None,
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
        }
    }

    /// Send rendered output and error reports elsewhere
    pub fn with_output(mut self, out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        self.out = out;
        self.err = err;
        self
    }

    /// Persist completed actions to a history file
    pub fn with_history(mut self, history: CommandHistory) -> Self {
        self.last_history = history.load().ok().and_then(|mut h| h.pop());
        self.history = Some(history);
        self
    }

    /// Handle the cancellation thread watches
    pub fn active_query(&self) -> ActiveQueryHandle {
        self.active.clone()
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut Variables {
        &mut self.variables
    }

    pub fn buffers(&self) -> &BufferPair {
        &self.buffers
    }

    fn prompt(&self) -> String {
        render_prompt(
            &self.variables.prompt_template(),
            &self.executor.display_name(),
            self.buffers.current().line_number(),
        )
    }

    /// Read and dispatch until quit or end of input
    pub fn run(&mut self, reader: &mut dyn LineReader) -> Result<Flow> {
        loop {
            let prompt = self.prompt();
            match reader.read_line(&prompt)? {
                ReadOutcome::Eof => {
                    debug!("[SQLSH_SESSION] End of input");
                    return Ok(Flow::Continue);
                }
                ReadOutcome::Interrupted => {
                    // Ctrl-C at the prompt drops whatever was being typed
                    self.buffers.current_mut().clear();
                }
                ReadOutcome::Line(line) => {
                    if self.handle_line(&line, reader) == Flow::Quit {
                        info!("[SQLSH_SESSION] Quit requested");
                        return Ok(Flow::Quit);
                    }
                }
            }
        }
    }

    /// Run script text through the same loop, then flush whatever statement
    /// was left without a trigger
    pub fn run_script(&mut self, reader: &mut dyn LineReader) -> Result<()> {
        if self.run(reader)? == Flow::Continue {
            self.flush_pending(reader);
        }
        Ok(())
    }

    /// Segment one input line and dispatch the action it carries, if any
    pub fn handle_line(&mut self, line: &str, reader: &mut dyn LineReader) -> Flow {
        let triggers = self.variables.triggers();
        match self
            .segmenter
            .segment(line, self.buffers.current_mut(), &triggers)
        {
            LineOutcome::Continue => Flow::Continue,
            LineOutcome::Action(detected) => match self.dispatch(detected, reader) {
                Ok(flow) => flow,
                Err(e) => {
                    self.report(&e);
                    Flow::Continue
                }
            },
        }
    }

    /// Execute a non-blank pending buffer with the default action
    pub fn flush_pending(&mut self, reader: &mut dyn LineReader) {
        if self.buffers.current().first_significant().is_none() {
            return;
        }
        let triggers = self.variables.triggers();
        let trigger = triggers.action_chars.chars().next().unwrap_or(';');
        let detected = DetectedAction {
            code: triggers.default_action,
            is_default: true,
            params: String::new(),
            action_text: trigger.to_string(),
        };
        debug!("[SQLSH_SESSION] Flushing pending buffer at end of script");
        if let Err(e) = self.dispatch(detected, reader) {
            self.report(&e);
        }
    }

    /// Render the executor's connection info to the console
    pub fn show_connection_info(&mut self) {
        let format = OutputFormat::from_code(self.variables.default_action())
            .unwrap_or(OutputFormat::Horizontal);
        let result = {
            let _guard = self.active.activate(self.executor.canceller());
            self.executor.connection_info()
        };
        match result {
            Ok(bundle) => {
                if let Err(e) = OutputFormatter::new(format).render(&bundle, &mut *self.out) {
                    warn!("[SQLSH_SESSION] Failed to render connection info: {}", e);
                }
            }
            Err(e) => self.report(&ShellError::Backend(e)),
        }
    }

    /// Report an error on the error stream; the session carries on
    pub fn report(&mut self, err: &ShellError) {
        let message = format!("✗ {}", err);
        let message = if self.variables.color() {
            message.red().to_string()
        } else {
            message
        };
        if writeln!(self.err, "{}", message).and_then(|_| self.err.flush()).is_err() {
            warn!("[SQLSH_SESSION] Cannot write to error stream: {}", err);
        }
    }

    /// Store a completed action in the reader and the history file
    fn record_history(&mut self, entry: String, reader: &mut dyn LineReader) {
        if self.last_history.as_deref() == Some(entry.as_str()) {
            return;
        }
        reader.add_history(&entry);
        if let Some(history) = &self.history {
            if let Err(e) = history.append(&entry) {
                warn!("[SQLSH_HISTORY] {}", e);
            }
        }
        self.last_history = Some(entry);
    }
}
