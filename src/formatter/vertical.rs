//! Vertical record blocks, one per row

use std::io::{self, Write};

use super::width::{display_lines, display_width, pad_left};
use super::NULL_DISPLAY;
use crate::results::ResultSet;

fn row_banner(number: usize) -> String {
    let stars = "*".repeat(27);
    format!("{} Row {} {}", stars, number, stars)
}

pub(crate) fn render(set: &ResultSet, out: &mut dyn Write) -> io::Result<()> {
    let labels: Vec<String> = set
        .columns()
        .iter()
        .map(|c| display_lines(c).join(" "))
        .collect();
    let label_width = labels.iter().map(|l| display_width(l)).max().unwrap_or(0) + 1;
    let continuation = " ".repeat(label_width);

    for (idx, row) in set.rows().iter().enumerate() {
        writeln!(out, "{}", row_banner(idx + 1))?;
        for (label, cell) in labels.iter().zip(row.cells()) {
            let lines = match cell {
                Some(value) => display_lines(value),
                None => vec![NULL_DISPLAY.to_string()],
            };
            let mut lines = lines.iter();
            let first = lines.next().map(String::as_str).unwrap_or("");
            writeln!(out, "{} | {}", pad_left(label, label_width), first)?;
            for line in lines {
                writeln!(out, "{} | {}", continuation, line)?;
            }
        }
    }
    Ok(())
}
