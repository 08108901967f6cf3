//! Action codes
//!
//! Maps the character after a trigger to what the dispatcher does with the
//! current buffer.

use std::fmt;

use crate::formatter::OutputFormat;

/// Action requested by an action code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Discard the current buffer
    Clear,
    /// Round-trip the current buffer through an external editor, then print
    Edit,
    /// Show the current buffer without executing it
    Print,
    /// Reopen the connection, optionally with a new credential
    Reconnect,
    /// Leave the main loop
    Quit,
    /// Submit the buffer (statement or command) and render the result
    Execute(OutputFormat),
}

impl Action {
    /// Resolve an action code. Codes without a meaning of their own execute
    /// with the format of `default_code`, or the horizontal table when the
    /// default code is not a format either.
    pub fn from_code(code: char, default_code: char) -> Self {
        match code {
            'q' => Action::Quit,
            'c' => Action::Clear,
            'e' => Action::Edit,
            'p' => Action::Print,
            'r' => Action::Reconnect,
            c => Action::Execute(OutputFormat::from_code(c).unwrap_or_else(|| {
                OutputFormat::from_code(default_code).unwrap_or(OutputFormat::Horizontal)
            })),
        }
    }

    /// Whether the action runs buffer text and therefore falls back to the
    /// previous statement when nothing has been typed
    pub fn executes(&self) -> bool {
        matches!(self, Action::Execute(_))
    }

    /// Whether a completed action leaves a history entry
    pub fn records_history(&self) -> bool {
        matches!(self, Action::Execute(_) | Action::Reconnect)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Clear => f.write_str("clear"),
            Action::Edit => f.write_str("edit"),
            Action::Print => f.write_str("print"),
            Action::Reconnect => f.write_str("reconnect"),
            Action::Quit => f.write_str("quit"),
            Action::Execute(format) => write!(f, "execute ({})", format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_actions() {
        assert_eq!(Action::from_code('q', 'g'), Action::Quit);
        assert_eq!(Action::from_code('c', 'g'), Action::Clear);
        assert_eq!(Action::from_code('e', 'g'), Action::Edit);
        assert_eq!(Action::from_code('p', 'g'), Action::Print);
        assert_eq!(Action::from_code('r', 'g'), Action::Reconnect);
    }

    #[test]
    fn test_format_actions() {
        assert_eq!(
            Action::from_code('G', 'g'),
            Action::Execute(OutputFormat::Vertical)
        );
        assert_eq!(Action::from_code('C', 'g'), Action::Execute(OutputFormat::Csv));
        assert_eq!(Action::from_code('F', 'g'), Action::Execute(OutputFormat::Flat));
    }

    #[test]
    fn test_unknown_code_uses_default_format() {
        assert_eq!(
            Action::from_code('z', 'T'),
            Action::Execute(OutputFormat::Tsv)
        );
        assert_eq!(
            Action::from_code('z', '?'),
            Action::Execute(OutputFormat::Horizontal)
        );
    }

    #[test]
    fn test_history_and_execution_flags() {
        assert!(Action::Execute(OutputFormat::List).executes());
        assert!(!Action::Reconnect.executes());
        assert!(Action::Reconnect.records_history());
        for action in [Action::Clear, Action::Edit, Action::Print, Action::Quit] {
            assert!(!action.records_history());
            assert!(!action.executes());
        }
    }
}
