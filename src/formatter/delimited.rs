//! CSV and TSV output
//!
//! CSV quotes every non-NULL field and doubles embedded quotes, so an empty
//! string (`""`) stays distinguishable from NULL (nothing between the
//! separators). TSV writes values raw.

use std::io::{self, Write};

use crate::results::ResultSet;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Dialect {
    separator: char,
    quote: Option<char>,
}

pub(crate) const CSV: Dialect = Dialect {
    separator: ',',
    quote: Some('"'),
};

pub(crate) const TSV: Dialect = Dialect {
    separator: '\t',
    quote: None,
};

impl Dialect {
    fn field(&self, value: Option<&str>, line: &mut String) {
        let Some(value) = value else {
            return;
        };
        match self.quote {
            Some(q) => {
                line.push(q);
                for c in value.chars() {
                    if c == q {
                        line.push(q);
                    }
                    line.push(c);
                }
                line.push(q);
            }
            None => line.push_str(value),
        }
    }

    fn write_record<'a, I>(&self, out: &mut dyn Write, values: I) -> io::Result<()>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut line = String::new();
        for (idx, value) in values.into_iter().enumerate() {
            if idx > 0 {
                line.push(self.separator);
            }
            self.field(value, &mut line);
        }
        writeln!(out, "{}", line)
    }
}

pub(crate) fn render(set: &ResultSet, dialect: Dialect, out: &mut dyn Write) -> io::Result<()> {
    dialect.write_record(out, set.columns().iter().map(|c| Some(c.as_str())))?;
    for row in set.rows() {
        dialect.write_record(out, row.cells().iter().map(|c| c.as_deref()))?;
    }
    Ok(())
}
