//! Display-width helpers for terminal renderers
//!
//! Cell text is sanitised before it is measured: line breaks split the value
//! into display lines, tabs expand to the next tab stop and control
//! characters become visible tags. Widths are terminal columns as reported
//! by `unicode-width`, so wide CJK characters count double and combining
//! marks count zero.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Tab stop used when expanding TAB characters
pub const TAB_STOP: usize = 8;

/// Terminal columns taken by `s`
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Visible replacement for a control character
fn control_tag(c: char) -> String {
    match c {
        '\u{07}' => "<BEL>".to_string(),
        '\u{08}' => "<BS>".to_string(),
        '\u{0B}' => "<VT>".to_string(),
        '\u{0C}' => "<FF>".to_string(),
        '\u{1B}' => "<ESC>".to_string(),
        '\u{7F}' => "<DEL>".to_string(),
        c => format!("<{:02X}>", c as u32),
    }
}

/// Split a value into printable display lines.
///
/// `\r\n`, lone `\r` and `\n` all end a line, so a value with k line breaks
/// always yields k + 1 lines.
pub fn display_lines(value: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut column = 0usize;
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut line));
                column = 0;
            }
            '\n' => {
                lines.push(std::mem::take(&mut line));
                column = 0;
            }
            '\t' => {
                let spaces = TAB_STOP - column % TAB_STOP;
                line.extend(std::iter::repeat(' ').take(spaces));
                column += spaces;
            }
            c if c.is_ascii_control() => {
                let tag = control_tag(c);
                column += tag.len();
                line.push_str(&tag);
            }
            c => {
                column += UnicodeWidthChar::width(c).unwrap_or(0);
                line.push(c);
            }
        }
    }
    lines.push(line);
    lines
}

/// Left-align `s` in a field `width` columns wide
pub fn pad_right(s: &str, width: usize) -> String {
    let mut out = String::with_capacity(s.len() + width);
    out.push_str(s);
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(display_width(s))));
    out
}

/// Right-align `s` in a field `width` columns wide
pub fn pad_left(s: &str, width: usize) -> String {
    let mut out: String = std::iter::repeat(' ')
        .take(width.saturating_sub(display_width(s)))
        .collect();
    out.push_str(s);
    out
}
