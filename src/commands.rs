//! Built-in commands
//!
//! A buffer whose first non-blank character is a command character holds a
//! built-in command instead of a statement, e.g. `*tables main.user%`.
//! Command names match by case-insensitive prefix as long as the prefix is
//! unambiguous (`*col` is `columns`, `*c` is ambiguous).

use crate::error::{Result, ShellError};
use crate::executor::ObjectSpec;
use crate::parser::Tokenizer;

/// Every command name, sorted
pub const COMMAND_NAMES: &[&str] = &[
    "catalogs",
    "columns",
    "help",
    "info",
    "reconnect",
    "schemas",
    "set",
    "tables",
    "unset",
];

pub const HELP_INTRO: &str = "\
Help commands:
  help [<command>]

Schema commands:
  catalogs
  schemas
  tables [[<catalog>.]<pattern>]
  columns [<catalog>.]<table>

Other commands:
  set [<variable>] [<value>]
  unset <variable>
  info
  reconnect [<database>]

Commands start with a command character (default '*') and run with any
action, e.g. '*tables;' or '*columns users\\G'.";

pub const HELP_NOT_FOUND: &str = "Help topic doesn't exist";

/// A parsed built-in command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Catalogs,
    Schemas,
    Tables(ObjectSpec),
    Columns(ObjectSpec),
    Info,
    Set {
        name: Option<String>,
        value: Option<String>,
    },
    Unset(String),
    Help(Option<String>),
    Reconnect(Option<String>),
}

/// Resolve a possibly abbreviated command name
pub fn resolve_name(prefix: &str) -> Result<&'static str> {
    let wanted = prefix.to_lowercase();
    if let Some(exact) = COMMAND_NAMES.iter().copied().find(|n| *n == wanted) {
        return Ok(exact);
    }
    let candidates: Vec<&'static str> = COMMAND_NAMES
        .iter()
        .copied()
        .filter(|n| n.starts_with(&wanted))
        .collect();
    match candidates.as_slice() {
        [] => Err(ShellError::UnknownCommand(prefix.to_string())),
        [single] => Ok(*single),
        many => Err(ShellError::AmbiguousCommand {
            prefix: prefix.to_string(),
            candidates: many.join(", "),
        }),
    }
}

/// Parse command-mode buffer text. Leading blanks and the command
/// character are skipped; arguments are tokenized like action parameters.
pub fn parse_command(text: &str, command_chars: &str) -> Result<Command> {
    let body = text.trim_start();
    let body = match body.chars().next() {
        Some(c) if command_chars.contains(c) => &body[c.len_utf8()..],
        _ => body,
    };

    let parsed = Tokenizer::default().tokenize(body);
    let mut tokens = parsed.tokens().iter().cloned();
    let Some(name) = tokens.next() else {
        return Ok(Command::Help(None));
    };
    let arg = tokens.next();
    let value = tokens.next();

    let command = match resolve_name(&name)? {
        "catalogs" => Command::Catalogs,
        "schemas" => Command::Schemas,
        "tables" => Command::Tables(ObjectSpec::parse(arg.as_deref())),
        "columns" => {
            let spec = ObjectSpec::parse(arg.as_deref());
            if spec.name.is_none() {
                return Err(ShellError::Usage("columns [<catalog>.]<table>".into()));
            }
            Command::Columns(spec)
        }
        "info" => Command::Info,
        "set" => Command::Set { name: arg, value },
        "unset" => match arg {
            Some(name) => Command::Unset(name),
            None => return Err(ShellError::Usage("unset <variable>".into())),
        },
        "help" => Command::Help(arg),
        "reconnect" => Command::Reconnect(arg),
        other => return Err(ShellError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

/// Help text for a topic, or the overview
pub fn help_text(topic: Option<&str>) -> &'static str {
    let Some(topic) = topic else {
        return HELP_INTRO;
    };
    match resolve_name(topic) {
        Ok("catalogs") => "catalogs\n  List the databases attached to the connection.",
        Ok("schemas") => "schemas\n  List catalog/schema pairs known to the connection.",
        Ok("tables") => {
            "tables [[<catalog>.]<pattern>]\n  List tables and views, optionally limited to one \
             catalog and filtered with a LIKE pattern."
        }
        Ok("columns") => "columns [<catalog>.]<table>\n  Describe the columns of a table.",
        Ok("info") => "info\n  Show details of the current connection.",
        Ok("set") => {
            "set [<variable>] [<value>]\n  With no arguments list all variables, with a name \
             show one, with a name and value change it for this session."
        }
        Ok("unset") => "unset <variable>\n  Drop a session override so the configured value applies again.",
        Ok("reconnect") => {
            "reconnect [<database>]\n  Reopen the connection, optionally to another database. \
             The current connection is kept if this fails."
        }
        Ok("help") => "help [<command>]\n  Show the command overview or help for one command.",
        _ => HELP_NOT_FOUND,
    }
}
