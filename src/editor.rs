//! External editor round trip
//!
//! The buffer is written to `sqlsh-<pid>.sql` inside a private temporary
//! directory, the editor runs on it in the foreground, and the file is read
//! back. The directory and file are removed whether or not the reload
//! worked.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, warn};

use crate::error::{Result, ShellError};

fn temp_path(dir: &Path) -> PathBuf {
    dir.join(format!("sqlsh-{}.sql", std::process::id()))
}

/// Run `editor` on a copy of `contents` and return the edited text.
///
/// `editor` is a shell command line and may carry its own arguments
/// (`code -w`); the file path is appended as the last argument.
pub fn edit_text(editor: &str, contents: &str) -> Result<String> {
    let dir = tempfile::Builder::new()
        .prefix("sqlsh-")
        .tempdir()
        .map_err(|e| ShellError::Editor(format!("Cannot create temp directory: {}", e)))?;
    let path = temp_path(dir.path());

    let result = run_editor(editor, &path, contents);

    if let Err(e) = fs::remove_file(&path) {
        debug!("[SQLSH_EDIT] Temp file already gone: {}", e);
    }
    if let Err(e) = dir.close() {
        warn!("[SQLSH_EDIT] Failed to remove temp directory: {}", e);
    }
    result
}

fn run_editor(editor: &str, path: &Path, contents: &str) -> Result<String> {
    fs::write(path, contents)
        .map_err(|e| ShellError::Editor(format!("Cannot write {}: {}", path.display(), e)))?;

    debug!("[SQLSH_EDIT] Running '{}' on {}", editor, path.display());
    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("{} \"$1\"", editor))
        .arg("sh")
        .arg(path)
        .status()
        .map_err(|e| ShellError::Editor(format!("Cannot run '{}': {}", editor, e)))?;
    if !status.success() {
        return Err(ShellError::Editor(format!("'{}' exited with {}", editor, status)));
    }

    fs::read_to_string(path)
        .map_err(|e| ShellError::Editor(format!("Cannot read back {}: {}", path.display(), e)))
}
