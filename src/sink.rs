//! Output sinks
//!
//! Where one action's rendered output goes: the console, a redirect file or
//! the stdin of a shell pipeline. A sink is opened before the statement is
//! submitted and closed when the action ends. `finish` reports close
//! errors; dropping an unfinished sink still flushes it and reaps the child.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

use log::debug;

use crate::error::{Result, ShellError};
use crate::parser::Pipeline;

enum Target<'a> {
    Console(&'a mut dyn Write),
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
    Pipe {
        command: String,
        stdin: Option<ChildStdin>,
        child: Child,
    },
    Closed,
}

/// Destination for one action's output.
pub struct OutputSink<'a> {
    target: Target<'a>,
}

impl<'a> OutputSink<'a> {
    /// Plain console output
    pub fn console(out: &'a mut dyn Write) -> Self {
        Self {
            target: Target::Console(out),
        }
    }

    /// Open the destination named by an action's pipeline clause. An empty
    /// pipe command runs `pager`.
    pub fn open(pipeline: Option<&Pipeline>, console: &'a mut dyn Write, pager: &str) -> Result<Self> {
        match pipeline {
            None => Ok(Self::console(console)),
            Some(Pipeline::Redirect(path)) => Self::file(path, false),
            Some(Pipeline::Append(path)) => Self::file(path, true),
            Some(Pipeline::Pipe(command)) if command.is_empty() => Self::pipe(pager),
            Some(Pipeline::Pipe(command)) => Self::pipe(command),
        }
    }

    fn file(path: &str, append: bool) -> Result<Self> {
        if path.is_empty() {
            return Err(ShellError::Sink("Missing file name after redirect".into()));
        }
        let file = if append {
            OpenOptions::new().create(true).append(true).open(path)
        } else {
            File::create(path)
        }
        .map_err(|e| ShellError::Sink(format!("Cannot open {}: {}", path, e)))?;

        debug!("[SQLSH_SINK] Writing to {} (append: {})", path, append);
        Ok(Self {
            target: Target::File {
                path: PathBuf::from(path),
                writer: BufWriter::new(file),
            },
        })
    }

    fn pipe(command: &str) -> Result<Self> {
        if command.trim().is_empty() {
            return Err(ShellError::Sink("No pager configured".into()));
        }
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| ShellError::Sink(format!("Cannot run '{}': {}", command, e)))?;
        let stdin = child.stdin.take();

        debug!("[SQLSH_SINK] Piping to '{}'", command);
        Ok(Self {
            target: Target::Pipe {
                command: command.to_string(),
                stdin,
                child,
            },
        })
    }

    pub fn is_console(&self) -> bool {
        matches!(self.target, Target::Console(_))
    }

    /// Flush and close the destination, waiting for a pipe to drain
    pub fn finish(mut self) -> Result<()> {
        let target = std::mem::replace(&mut self.target, Target::Closed);
        Self::close(target)
    }

    fn close(target: Target<'_>) -> Result<()> {
        match target {
            Target::Console(out) => out.flush()?,
            Target::File { path, mut writer } => writer
                .flush()
                .map_err(|e| ShellError::Sink(format!("Cannot write {}: {}", path.display(), e)))?,
            Target::Pipe {
                command,
                stdin,
                mut child,
            } => {
                if let Some(mut stdin) = stdin {
                    match stdin.flush() {
                        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => {
                            return Err(ShellError::Sink(format!("Cannot write to '{}': {}", command, e)))
                        }
                        _ => {}
                    }
                }
                let status = child
                    .wait()
                    .map_err(|e| ShellError::Sink(format!("Cannot wait for '{}': {}", command, e)))?;
                debug!("[SQLSH_SINK] '{}' exited with {}", command, status);
            }
            Target::Closed => {}
        }
        Ok(())
    }
}

impl Write for OutputSink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.target {
            Target::Console(out) => out.write(buf),
            Target::File { writer, .. } => writer.write(buf),
            Target::Pipe {
                stdin: Some(stdin), ..
            } => stdin.write(buf),
            Target::Pipe { stdin: None, .. } | Target::Closed => {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "output is closed"))
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.target {
            Target::Console(out) => out.flush(),
            Target::File { writer, .. } => writer.flush(),
            Target::Pipe {
                stdin: Some(stdin), ..
            } => stdin.flush(),
            Target::Pipe { stdin: None, .. } | Target::Closed => Ok(()),
        }
    }
}

impl Drop for OutputSink<'_> {
    fn drop(&mut self) {
        let target = std::mem::replace(&mut self.target, Target::Closed);
        if let Err(e) = Self::close(target) {
            debug!("[SQLSH_SINK] Error closing output: {}", e);
        }
    }
}
