//! Statement buffers
//!
//! The shell keeps exactly two buffers for the whole session: the one being
//! typed into ("current") and the last submitted statement ("previous").
//! Storage grows on demand; a buffer never drops input silently. If the
//! allocator cannot satisfy a growth request the process aborts, which is
//! the only fatal path in the shell.

use std::mem;

/// Bytes reserved for each buffer when a session starts
pub const INITIAL_BUFFER_SIZE: usize = 1024;

/// Growable accumulator for statement text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatementBuffer {
    text: String,
    /// Number of characters appended, tracked so `length()` stays O(1)
    chars: usize,
}

impl StatementBuffer {
    /// Create an empty buffer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            chars: 0,
        }
    }

    /// Append one character, growing geometrically when full
    pub fn append(&mut self, c: char) {
        self.text.push(c);
        self.chars += 1;
    }

    /// Append every character of `s`
    pub fn append_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.chars += s.chars().count();
    }

    /// Reset to empty, keeping the allocation
    pub fn clear(&mut self) {
        self.text.clear();
        self.chars = 0;
    }

    /// Replace the whole contents
    pub fn replace(&mut self, s: &str) {
        self.clear();
        self.append_str(s);
    }

    /// Exchange storage with `other` without copying content
    pub fn swap(&mut self, other: &mut StatementBuffer) {
        mem::swap(self, other);
    }

    /// Logical length in characters
    pub fn length(&self) -> usize {
        self.chars
    }

    pub fn is_empty(&self) -> bool {
        self.chars == 0
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.text.capacity()
    }

    pub fn contents(&self) -> &str {
        &self.text
    }

    /// 1-based number of the line currently being typed
    pub fn line_number(&self) -> usize {
        self.text.matches('\n').count() + 1
    }

    /// First non-whitespace character, used to detect command-mode buffers
    pub fn first_significant(&self) -> Option<char> {
        self.text.chars().find(|c| !c.is_whitespace())
    }
}

/// The current/previous buffer pair owned by the main loop.
#[derive(Debug, Default)]
pub struct BufferPair {
    current: StatementBuffer,
    previous: StatementBuffer,
}

impl BufferPair {
    pub fn new(capacity: usize) -> Self {
        Self {
            current: StatementBuffer::with_capacity(capacity),
            previous: StatementBuffer::with_capacity(capacity),
        }
    }

    pub fn current(&self) -> &StatementBuffer {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut StatementBuffer {
        &mut self.current
    }

    pub fn previous(&self) -> &StatementBuffer {
        &self.previous
    }

    /// Make the current buffer the previous one and vice versa
    pub fn swap(&mut self) {
        self.current.swap(&mut self.previous);
    }

    /// Retire the current statement: it becomes "previous" and a fresh,
    /// empty buffer becomes current.
    pub fn retire_current(&mut self) {
        self.swap();
        self.current.clear();
    }

    /// Statement text an executing action should run: the current buffer,
    /// or the previous one when nothing has been typed. `None` when both
    /// are empty. Neither buffer changes.
    pub fn statement_for_execution(&self) -> Option<&str> {
        if !self.current.is_empty() {
            Some(self.current.contents())
        } else if !self.previous.is_empty() {
            Some(self.previous.contents())
        } else {
            None
        }
    }

    /// Copy the previous statement into an empty current buffer
    pub fn repeat_previous(&mut self) {
        if self.current.is_empty() && !self.previous.is_empty() {
            let repeated = self.previous.contents().to_string();
            self.current.replace(&repeated);
        }
    }
}
