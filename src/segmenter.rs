//! Input segmentation
//!
//! Splits each typed line into statement text (appended to the current
//! buffer) and, at most once per line, an action: a trigger character
//! followed by an action code and free-form parameter text.
//!
//! Rules, applied left to right outside of SQL quotes (a quote closes at
//! the end of its line at the latest, and quotes inside a `--` comment are
//! plain text):
//! - trigger + trigger: one literal trigger character (the second) is kept
//! - trigger at end of line: the default action with empty parameters
//! - trigger + whitespace: the default action, the rest of the line is its
//!   parameter text
//! - trigger + anything else: that character is the action code, the rest
//!   of the line is its parameter text
//!
//! A line without an action contributes its text plus a newline.

use crate::buffer::StatementBuffer;

/// Character sets consulted while segmenting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triggers {
    pub action_chars: String,
    pub command_chars: String,
    pub default_action: char,
}

impl Triggers {
    pub fn new(
        action_chars: impl Into<String>,
        command_chars: impl Into<String>,
        default_action: char,
    ) -> Self {
        Self {
            action_chars: action_chars.into(),
            command_chars: command_chars.into(),
            default_action,
        }
    }

    fn is_action(&self, c: char) -> bool {
        self.action_chars.contains(c)
    }

    fn is_command(&self, c: char) -> bool {
        self.command_chars.contains(c)
    }

    /// Whether `text` is a built-in command: its first non-whitespace
    /// character is a command character
    pub fn starts_command(&self, text: &str) -> bool {
        text.chars()
            .find(|c| !c.is_whitespace())
            .is_some_and(|c| self.is_command(c))
    }
}

/// An action recognised on an input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedAction {
    /// Action code (the default action code when `is_default`)
    pub code: char,
    /// Set when the trigger was not followed by an explicit code
    pub is_default: bool,
    /// Text after the action code, handed to the tokenizer later
    pub params: String,
    /// Raw line tail starting at the trigger, recorded in history
    pub action_text: String,
}

/// Result of segmenting one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Statement continues on the next line
    Continue,
    /// An action fired; the rest of the line was not segmented
    Action(DetectedAction),
}

/// Line scanner. Nothing is carried from one line to the next: a quote
/// left open at the end of a line is literal text and does not hide
/// triggers on later lines.
#[derive(Debug, Default)]
pub struct InputSegmenter;

impl InputSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Consume one complete input line (newline already stripped).
    pub fn segment(
        &self,
        line: &str,
        buffer: &mut StatementBuffer,
        triggers: &Triggers,
    ) -> LineOutcome {
        let mut chars = line.char_indices().peekable();
        let mut quote: Option<char> = None;
        let mut in_comment = false;

        while let Some((idx, c)) = chars.next() {
            if let Some(q) = quote {
                buffer.append(c);
                if c == q {
                    quote = None;
                }
                continue;
            }

            if !triggers.is_action(c) {
                if in_comment {
                    buffer.append(c);
                    continue;
                }
                match c {
                    '\'' | '"' => quote = Some(c),
                    '-' if matches!(chars.peek(), Some((_, '-'))) => in_comment = true,
                    _ => {}
                }
                buffer.append(c);
                continue;
            }

            let action_text = line[idx..].to_string();
            let (code, is_default, params) = match chars.peek().copied() {
                None => (triggers.default_action, true, String::new()),
                Some((_, next)) if triggers.is_action(next) => {
                    // Doubled trigger: keep one literal trigger character
                    chars.next();
                    buffer.append(next);
                    continue;
                }
                Some((next_idx, next)) if next.is_whitespace() => {
                    (triggers.default_action, true, line[next_idx..].to_string())
                }
                Some((next_idx, next)) => {
                    let rest = next_idx + next.len_utf8();
                    (next, false, line[rest..].to_string())
                }
            };

            return LineOutcome::Action(DetectedAction {
                code,
                is_default,
                params,
                action_text,
            });
        }

        buffer.append('\n');
        LineOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triggers() -> Triggers {
        Triggers::new("\\;", "*", 'g')
    }

    fn run(lines: &[&str]) -> (StatementBuffer, Vec<LineOutcome>) {
        let seg = InputSegmenter::new();
        let mut buf = StatementBuffer::default();
        let outcomes = lines
            .iter()
            .map(|l| seg.segment(l, &mut buf, &triggers()))
            .collect();
        (buf, outcomes)
    }

    fn action(outcome: &LineOutcome) -> &DetectedAction {
        match outcome {
            LineOutcome::Action(a) => a,
            LineOutcome::Continue => panic!("expected an action"),
        }
    }

    #[test]
    fn test_trigger_at_end_uses_default_action() {
        let (buf, outcomes) = run(&["SELECT 1;"]);
        assert_eq!(buf.contents(), "SELECT 1");
        let a = action(&outcomes[0]);
        assert_eq!(a.code, 'g');
        assert!(a.is_default);
        assert_eq!(a.params, "");
        assert_eq!(a.action_text, ";");
    }

    #[test]
    fn test_explicit_action_code_and_params() {
        let (buf, outcomes) = run(&["SELECT * FROM t\\G > out.txt"]);
        assert_eq!(buf.contents(), "SELECT * FROM t");
        let a = action(&outcomes[0]);
        assert_eq!(a.code, 'G');
        assert!(!a.is_default);
        assert_eq!(a.params, " > out.txt");
        assert_eq!(a.action_text, "\\G > out.txt");
    }

    #[test]
    fn test_trigger_followed_by_whitespace_is_default() {
        let (_, outcomes) = run(&["SELECT 1; | less"]);
        let a = action(&outcomes[0]);
        assert_eq!(a.code, 'g');
        assert!(a.is_default);
        assert_eq!(a.params, " | less");
    }

    #[test]
    fn test_multi_line_statement() {
        let (buf, outcomes) = run(&["SELECT a,", "  b FROM t", "\\g"]);
        assert_eq!(outcomes[0], LineOutcome::Continue);
        assert_eq!(outcomes[1], LineOutcome::Continue);
        assert_eq!(buf.contents(), "SELECT a,\n  b FROM t\n");
        assert_eq!(action(&outcomes[2]).code, 'g');
    }

    #[test]
    fn test_doubled_trigger_is_literal() {
        let (buf, outcomes) = run(&["SELECT 'a' || '\\\\' AS x\\\\"]);
        // Inside quotes the trigger is literal anyway; outside, doubling escapes it
        assert_eq!(outcomes[0], LineOutcome::Continue);
        assert_eq!(buf.contents(), "SELECT 'a' || '\\\\' AS x\\\n");
    }

    #[test]
    fn test_doubled_semicolon_outside_quotes() {
        let (buf, outcomes) = run(&["CREATE TRIGGER x BEGIN SELECT 1;; END;"]);
        assert_eq!(buf.contents(), "CREATE TRIGGER x BEGIN SELECT 1; END");
        assert!(action(&outcomes[0]).is_default);
    }

    #[test]
    fn test_trigger_inside_quotes_is_literal() {
        let (buf, outcomes) = run(&["SELECT 'a;b', \"c\\d\";"]);
        assert_eq!(buf.contents(), "SELECT 'a;b', \"c\\d\"");
        assert_eq!(action(&outcomes[0]).code, 'g');
    }

    #[test]
    fn test_open_quote_ends_with_line() {
        let (buf, outcomes) = run(&["SELECT 'oops", "\\q"]);
        assert_eq!(outcomes[0], LineOutcome::Continue);
        assert_eq!(buf.contents(), "SELECT 'oops\n");
        assert_eq!(action(&outcomes[1]).code, 'q');
    }

    #[test]
    fn test_apostrophe_in_comment_is_not_a_quote() {
        let (buf, outcomes) = run(&["SELECT 1 -- don't care;"]);
        assert_eq!(buf.contents(), "SELECT 1 -- don't care");
        assert!(action(&outcomes[0]).is_default);

        let (_, outcomes) = run(&["SELECT 1 -- don't care", ";"]);
        assert_eq!(outcomes[0], LineOutcome::Continue);
        assert!(matches!(outcomes[1], LineOutcome::Action(_)));
    }

    #[test]
    fn test_comment_marker_inside_quotes_is_text() {
        let (buf, outcomes) = run(&["SELECT '--', 'it''s';"]);
        assert_eq!(buf.contents(), "SELECT '--', 'it''s'");
        assert!(matches!(outcomes[0], LineOutcome::Action(_)));
    }

    #[test]
    fn test_starts_command() {
        assert!(triggers().starts_command("  *tables foo"));
        assert!(!triggers().starts_command("SELECT 1"));
        assert!(!triggers().starts_command("   "));
    }

    #[test]
    fn test_quit_mid_line() {
        let (buf, outcomes) = run(&["SELECT 1 FROM \\q"]);
        assert_eq!(buf.contents(), "SELECT 1 FROM ");
        assert_eq!(action(&outcomes[0]).code, 'q');
    }

    #[test]
    fn test_empty_line_appends_newline() {
        let (buf, outcomes) = run(&[""]);
        assert_eq!(outcomes[0], LineOutcome::Continue);
        assert_eq!(buf.contents(), "\n");
    }
}
