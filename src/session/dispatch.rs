//! Action dispatch
//!
//! Each action runs to completion before the next line is read. Executing
//! actions open their output sink first, so a destination that cannot be
//! opened abandons the action before anything reaches the backend.

use std::io::{self, Write};

use log::{debug, info};

use super::commands::{run_command, CommandOutput};
use super::{Flow, LineReader, Session};
use crate::actions::Action;
use crate::editor::edit_text;
use crate::error::{Result, ShellError};
use crate::executor::QueryExecutor;
use crate::formatter::{OutputFormat, OutputFormatter};
use crate::history::history_entry;
use crate::results::ResultBundle;
use crate::segmenter::DetectedAction;
use crate::sink::OutputSink;

/// Render into a sink. A reader that went away early (`| head`) is not an
/// error.
fn render_to(formatter: &OutputFormatter, bundle: &ResultBundle, sink: &mut OutputSink<'_>) -> Result<()> {
    match formatter.render(bundle, sink) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe && !sink.is_console() => {
            debug!("[SQLSH_SINK] Reader closed the pipe early");
            Ok(())
        }
        Err(e) => Err(ShellError::Sink(e.to_string())),
        Ok(()) => Ok(()),
    }
}

fn write_message(message: &str, sink: &mut OutputSink<'_>) -> Result<()> {
    let written = if message.ends_with('\n') {
        write!(sink, "{}", message)
    } else {
        writeln!(sink, "{}", message)
    };
    match written.and_then(|_| sink.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe && !sink.is_console() => Ok(()),
        Err(e) => Err(ShellError::Sink(e.to_string())),
        Ok(()) => Ok(()),
    }
}

impl<E: QueryExecutor> Session<E> {
    /// Carry out one detected action
    pub(crate) fn dispatch(&mut self, detected: DetectedAction, reader: &mut dyn LineReader) -> Result<Flow> {
        let action = Action::from_code(detected.code, self.variables.default_action());
        debug!(
            "[SQLSH_DISPATCH] {} (code '{}', params '{}')",
            action, detected.code, detected.params
        );

        match action {
            Action::Quit => return Ok(Flow::Quit),
            Action::Clear => {
                self.buffers.current_mut().clear();
            }
            Action::Print => self.print_buffer()?,
            Action::Edit => {
                let editor = self.variables.editor();
                let edited = edit_text(&editor, self.buffers.current().contents())?;
                self.buffers.current_mut().replace(&edited);
                self.print_buffer()?;
            }
            Action::Reconnect => self.reconnect(&detected, reader)?,
            Action::Execute(format) => self.execute(format, &detected, reader)?,
        }
        Ok(Flow::Continue)
    }

    fn print_buffer(&mut self) -> Result<()> {
        let mut sink = OutputSink::console(&mut *self.out);
        write_message(self.buffers.current().contents(), &mut sink)?;
        sink.finish()
    }

    fn reconnect(&mut self, detected: &DetectedAction, reader: &mut dyn LineReader) -> Result<()> {
        if self.buffers.statement_for_execution().is_none() {
            debug!("[SQLSH_DISPATCH] Both buffers empty, reconnect skipped");
            return Ok(());
        }
        let parsed = self.tokenizer.tokenize(&detected.params);
        let credential = parsed.token(0);
        info!(
            "[SQLSH_DISPATCH] Reconnecting{}",
            credential.map(|c| format!(" to {}", c)).unwrap_or_default()
        );
        self.executor.reconnect(credential)?;

        let format = OutputFormat::from_code(self.variables.default_action())
            .unwrap_or(OutputFormat::Horizontal);
        let bundle = self.executor.connection_info()?;
        let mut sink = OutputSink::console(&mut *self.out);
        render_to(&OutputFormatter::new(format), &bundle, &mut sink)?;
        sink.finish()?;

        let entry = history_entry(self.buffers.current().contents(), &detected.action_text);
        self.record_history(entry, reader);
        Ok(())
    }

    fn execute(
        &mut self,
        format: OutputFormat,
        detected: &DetectedAction,
        reader: &mut dyn LineReader,
    ) -> Result<()> {
        let Some(text) = self.buffers.statement_for_execution().map(str::to_string) else {
            debug!("[SQLSH_DISPATCH] Nothing to execute");
            return Ok(());
        };
        let parsed = self.tokenizer.tokenize(&detected.params);
        let is_command = self.variables.triggers().starts_command(&text);
        let pager = self.variables.pager();

        let mut sink = OutputSink::open(parsed.pipeline(), &mut *self.out, &pager)?;
        self.buffers.repeat_previous();

        let outcome = if is_command {
            run_command(&mut self.executor, &mut self.variables, &self.active, &text)
        } else {
            let _guard = self.active.activate(self.executor.canceller());
            self.executor
                .execute(&text, parsed.tokens())
                .map(CommandOutput::Results)
                .map_err(ShellError::from)
        };

        let rendered = match outcome {
            Ok(CommandOutput::Results(bundle)) => {
                render_to(&OutputFormatter::new(format), &bundle, &mut sink)
                    .and_then(|_| sink.finish())
            }
            Ok(CommandOutput::Message(message)) => {
                write_message(&message, &mut sink).and_then(|_| sink.finish())
            }
            Err(e) => {
                drop(sink);
                Err(e)
            }
        };

        let entry = history_entry(&text, &detected.action_text);
        self.record_history(entry, reader);
        self.buffers.retire_current();
        rendered
    }
}
