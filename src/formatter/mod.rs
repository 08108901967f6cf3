//! Output formatters for query results
//!
//! Rendering is a pure function of a [`ResultBundle`], an [`OutputFormat`]
//! and a writer: the same bundle rendered twice produces the same bytes.
//! Each result set is followed by a row-count footer; the horizontal and
//! vertical formats also report elapsed time. Warnings are written once,
//! after the last set.

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use crate::results::{ResultBundle, ResultSet, NO_ROW_COUNT};

mod delimited;
mod list;
mod table;
mod vertical;
pub mod width;

/// How NULL cells are shown in every non-delimited format
pub const NULL_DISPLAY: &str = "*NULL*";

/// Output format selected by an action code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Horizontal,
    Vertical,
    Csv,
    Tsv,
    List,
    Flat,
}

impl OutputFormat {
    /// Format bound to an action code, if any
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'g' => Some(OutputFormat::Horizontal),
            'G' => Some(OutputFormat::Vertical),
            'C' => Some(OutputFormat::Csv),
            'T' => Some(OutputFormat::Tsv),
            'L' => Some(OutputFormat::List),
            'F' => Some(OutputFormat::Flat),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            OutputFormat::Horizontal => 'g',
            OutputFormat::Vertical => 'G',
            OutputFormat::Csv => 'C',
            OutputFormat::Tsv => 'T',
            OutputFormat::List => 'L',
            OutputFormat::Flat => 'F',
        }
    }

    /// Whether footers carry the elapsed time
    pub fn shows_elapsed(self) -> bool {
        matches!(self, OutputFormat::Horizontal | OutputFormat::Vertical)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Horizontal => "horizontal",
            OutputFormat::Vertical => "vertical",
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::List => "list",
            OutputFormat::Flat => "flat",
        };
        f.write_str(name)
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        "row"
    } else {
        "rows"
    }
}

/// `S.UUUUUU sec`
fn elapsed(d: Duration) -> String {
    format!("{}.{:06} sec", d.as_secs(), d.subsec_micros())
}

/// Formats query results for display
#[derive(Debug, Clone, Copy)]
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render every set of `bundle`, then its warnings
    pub fn render(&self, bundle: &ResultBundle, out: &mut dyn Write) -> io::Result<()> {
        for (idx, set) in bundle.sets().iter().enumerate() {
            if idx > 0 {
                writeln!(out)?;
            }
            self.render_set(set, out)?;
        }
        for warning in bundle.warnings() {
            writeln!(out, "Warning: {}", warning)?;
        }
        out.flush()
    }

    fn render_set(&self, set: &ResultSet, out: &mut dyn Write) -> io::Result<()> {
        if set.is_data() {
            match self.format {
                OutputFormat::Horizontal => table::render(set, out)?,
                OutputFormat::Vertical => vertical::render(set, out)?,
                OutputFormat::Csv => delimited::render(set, delimited::CSV, out)?,
                OutputFormat::Tsv => delimited::render(set, delimited::TSV, out)?,
                OutputFormat::List => list::render_list(set, out)?,
                OutputFormat::Flat => list::render_flat(set, out)?,
            }
        }
        writeln!(out, "{}", self.footer(set))
    }

    /// Row-count summary line for one set
    pub fn footer(&self, set: &ResultSet) -> String {
        let count = set.row_count();
        let mut line = if set.is_data() {
            format!("{} {} in set", count, plural(count))
        } else if count == NO_ROW_COUNT {
            "Success".to_string()
        } else {
            format!("{} {} affected", count, plural(count))
        };
        if self.format.shows_elapsed() {
            line.push_str(&format!(" ({})", elapsed(set.elapsed())));
        }
        line
    }
}
