//! Horizontal box-drawn table

use std::io::{self, Write};

use super::width::{display_lines, display_width, pad_right};
use super::NULL_DISPLAY;
use crate::results::{Cell, ResultSet};

/// Border line built from the given corner/junction characters
fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    for (idx, width) in widths.iter().enumerate() {
        line.push_str(&"─".repeat(width + 2));
        line.push(if idx == widths.len() - 1 { right } else { mid });
    }
    line
}

/// One logical row as display lines per column
fn cell_lines(cell: &Cell) -> Vec<String> {
    match cell {
        Some(value) => display_lines(value),
        None => vec![NULL_DISPLAY.to_string()],
    }
}

/// Write one logical row. The row is as tall as its tallest cell; shorter
/// cells are padded with blank sub-lines.
fn write_row(out: &mut dyn Write, cells: &[Vec<String>], widths: &[usize]) -> io::Result<()> {
    let height = cells.iter().map(Vec::len).max().unwrap_or(1);
    for sub in 0..height {
        let mut line = String::from("│");
        for (lines, width) in cells.iter().zip(widths) {
            let text = lines.get(sub).map(String::as_str).unwrap_or("");
            line.push(' ');
            line.push_str(&pad_right(text, *width));
            line.push_str(" │");
        }
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

pub(crate) fn render(set: &ResultSet, out: &mut dyn Write) -> io::Result<()> {
    let header: Vec<Vec<String>> = set.columns().iter().map(|c| display_lines(c)).collect();
    let body: Vec<Vec<Vec<String>>> = set
        .rows()
        .iter()
        .map(|row| row.cells().iter().map(cell_lines).collect())
        .collect();

    let mut widths = vec![0usize; header.len()];
    for cells in std::iter::once(&header).chain(body.iter()) {
        for (idx, lines) in cells.iter().enumerate() {
            let widest = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
            widths[idx] = widths[idx].max(widest);
        }
    }

    writeln!(out, "{}", border(&widths, '┌', '┬', '┐'))?;
    write_row(out, &header, &widths)?;
    writeln!(out, "{}", border(&widths, '├', '┼', '┤'))?;
    for cells in &body {
        write_row(out, cells, &widths)?;
    }
    writeln!(out, "{}", border(&widths, '└', '┴', '┘'))?;
    Ok(())
}
