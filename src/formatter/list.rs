//! Column-oriented list and flat output

use std::io::{self, Write};

use super::NULL_DISPLAY;
use crate::results::ResultSet;

fn shown(cell: &Option<String>) -> &str {
    cell.as_deref().unwrap_or(NULL_DISPLAY)
}

/// `column: v1, v2, ...` with one line per column
pub(crate) fn render_list(set: &ResultSet, out: &mut dyn Write) -> io::Result<()> {
    for (idx, column) in set.columns().iter().enumerate() {
        let values: Vec<&str> = set
            .rows()
            .iter()
            .map(|row| row.cells().get(idx).map(shown).unwrap_or(NULL_DISPLAY))
            .collect();
        writeln!(out, "{}: {}", column, values.join(", "))?;
    }
    Ok(())
}

/// Column name, value and a blank line for every cell, row by row
pub(crate) fn render_flat(set: &ResultSet, out: &mut dyn Write) -> io::Result<()> {
    for row in set.rows() {
        for (column, cell) in set.columns().iter().zip(row.cells()) {
            write!(out, "{}\n{}\n\n", column, shown(cell))?;
        }
    }
    Ok(())
}
