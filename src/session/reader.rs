//! Line sources for the main loop
//!
//! Interactive sessions read through rustyline; `-c`, `-f` and tests feed a
//! fixed list of lines through [`ScriptReader`] so both paths share the same
//! segmenter and dispatcher.

use std::collections::VecDeque;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, EditMode, Editor};

use crate::error::{Result, ShellError};

/// What one read produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete line without its newline
    Line(String),
    /// Ctrl-C at the prompt
    Interrupted,
    /// End of input (Ctrl-D, end of script)
    Eof,
}

/// Supplies one logical line per call.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;

    /// Remember a completed action for recall
    fn add_history(&mut self, entry: &str);
}

/// Terminal line editor.
pub struct RustylineReader {
    editor: Editor<(), DefaultHistory>,
}

impl RustylineReader {
    /// Create an editor preloaded with `history`
    pub fn new(history: &[String]) -> Result<Self> {
        let config = Config::builder()
            .edit_mode(EditMode::Emacs)
            .auto_add_history(false)
            .build();
        let mut editor = Editor::<(), DefaultHistory>::with_config(config)
            .map_err(|e| ShellError::Readline(e.to_string()))?;
        for entry in history {
            let _ = editor.add_history_entry(entry.as_str());
        }
        Ok(Self { editor })
    }
}

impl LineReader for RustylineReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(e) => Err(ShellError::Readline(e.to_string())),
        }
    }

    fn add_history(&mut self, entry: &str) {
        let _ = self.editor.add_history_entry(entry);
    }
}

/// Pre-recorded input.
#[derive(Debug, Default)]
pub struct ScriptReader {
    lines: VecDeque<ReadOutcome>,
    history: Vec<String>,
}

impl ScriptReader {
    /// One line per line of `text`
    pub fn new(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(|l| ReadOutcome::Line(l.into())).collect(),
            history: Vec::new(),
        }
    }

    /// Queue a Ctrl-C at the prompt
    pub fn push_interrupt(&mut self) {
        self.lines.push_back(ReadOutcome::Interrupted);
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push_back(ReadOutcome::Line(line.into()));
    }

    /// History entries added so far
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl LineReader for ScriptReader {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome> {
        Ok(self.lines.pop_front().unwrap_or(ReadOutcome::Eof))
    }

    fn add_history(&mut self, entry: &str) {
        self.history.push(entry.to_string());
    }
}
