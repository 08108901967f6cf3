//! Action parameter tokenizer
//!
//! Turns the parameter text that follows an action code into literal tokens
//! plus an optional trailing output clause (`> file`, `>> file`, `| command`).

use log::debug;

/// Maximum number of tokens kept from one parameter string. Extra tokens
/// are dropped.
pub const MAX_TOKENS: usize = 16;

/// Trailing output clause of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pipeline {
    /// `> path`: create or truncate the file
    Redirect(String),
    /// `>> path`: create or append to the file
    Append(String),
    /// `| command`: pipe output into a shell command (empty = pager)
    Pipe(String),
}

/// Tokenized action parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLine {
    tokens: Vec<String>,
    pipeline: Option<Pipeline>,
}

impl ParsedLine {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn token(&self, idx: usize) -> Option<&str> {
        self.tokens.get(idx).map(String::as_str)
    }

    pub fn pipeline(&self) -> Option<&Pipeline> {
        self.pipeline.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.pipeline.is_none()
    }
}

/// Quote- and escape-aware splitter for parameter text.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    max_tokens: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(MAX_TOKENS)
    }
}

impl Tokenizer {
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    /// Tokenize `input`. Never fails: an unterminated quote runs to the end
    /// of the string and a dangling backslash is kept literally.
    pub fn tokenize(&self, input: &str) -> ParsedLine {
        let mut tokens = Vec::new();
        let mut pipeline = None;

        let mut current = String::new();
        let mut has_token = false;
        let mut quote: Option<char> = None;
        let mut escape = false;

        let mut flush = |current: &mut String, has_token: &mut bool| {
            if *has_token {
                if tokens.len() < self.max_tokens {
                    tokens.push(std::mem::take(current));
                } else {
                    debug!("[SQLSH_PARSE] Dropping token beyond limit: {:?}", current);
                    current.clear();
                }
            }
            *has_token = false;
        };

        let mut chars = input.char_indices().peekable();
        while let Some((idx, c)) = chars.next() {
            if escape {
                current.push(c);
                has_token = true;
                escape = false;
                continue;
            }

            if c == '\\' {
                escape = true;
                continue;
            }

            if let Some(q) = quote {
                if c == q {
                    quote = None;
                } else {
                    current.push(c);
                }
                continue;
            }

            match c {
                '"' | '\'' => {
                    quote = Some(c);
                    has_token = true;
                }
                '>' => {
                    flush(&mut current, &mut has_token);
                    pipeline = Some(match chars.peek() {
                        Some((next_idx, '>')) => {
                            Pipeline::Append(input[next_idx + 1..].trim().to_string())
                        }
                        _ => Pipeline::Redirect(input[idx + 1..].trim().to_string()),
                    });
                    break;
                }
                '|' => {
                    flush(&mut current, &mut has_token);
                    pipeline = Some(Pipeline::Pipe(input[idx + 1..].trim().to_string()));
                    break;
                }
                c if c.is_whitespace() => flush(&mut current, &mut has_token),
                c => {
                    current.push(c);
                    has_token = true;
                }
            }
        }

        if escape {
            current.push('\\');
            has_token = true;
        }
        flush(&mut current, &mut has_token);

        ParsedLine { tokens, pipeline }
    }
}
