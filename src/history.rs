//! Command history persistence
//!
//! One entry per completed action: the statement text flattened onto a
//! single line, followed by the action text that fired it, so recalling an
//! entry re-runs the same action.

use std::path::{Path, PathBuf};

use crate::error::{Result, ShellError};

/// Normalized history entry for a statement and the action text after it
pub fn history_entry(statement: &str, action_text: &str) -> String {
    let mut entry = statement.replace('\n', " ");
    entry.push_str(action_text);
    entry
}

/// Bounded history file, one entry per line.
pub struct CommandHistory {
    path: PathBuf,
    max_size: usize,
}

impl CommandHistory {
    pub fn with_path<P: AsRef<Path>>(path: P, max_size: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_size,
        }
    }

    /// Stored entries, oldest first, at most `max_size` of them
    pub fn load(&self) -> Result<Vec<String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ShellError::History(format!(
                    "Cannot read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let entries: Vec<&str> = contents.lines().collect();
        let skip = entries.len().saturating_sub(self.max_size);
        Ok(entries[skip..].iter().map(|e| e.to_string()).collect())
    }

    /// Rewrite the file with the newest `max_size` entries
    pub fn save(&self, history: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ShellError::History(format!("Cannot create {}: {}", parent.display(), e)))?;
        }

        let skip = history.len().saturating_sub(self.max_size);
        let mut contents = history[skip..].join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }

        std::fs::write(&self.path, contents).map_err(|e| {
            ShellError::History(format!("Cannot write {}: {}", self.path.display(), e))
        })
    }

    /// Append an entry unless it is blank or repeats the last one.
    /// Returns whether the entry was added.
    pub fn append(&self, entry: &str) -> Result<bool> {
        if entry.trim().is_empty() {
            return Ok(false);
        }
        let mut history = self.load()?;
        if history.last().map(|s| s.as_str()) == Some(entry) {
            return Ok(false);
        }

        history.push(entry.to_string());
        self.save(&history)?;
        Ok(true)
    }
}
