//! Built-in command execution

use log::debug;

use crate::cancel::ActiveQueryHandle;
use crate::commands::{help_text, parse_command, Command};
use crate::config::Variables;
use crate::error::Result;
use crate::executor::QueryExecutor;
use crate::results::{ResultBundle, ResultSet};

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Tabular output rendered with the action's format
    Results(ResultBundle),
    /// Plain text written as-is
    Message(String),
}

fn variable_row(name: &str, value: Option<String>) -> ResultBundle {
    let missing = value.is_none();
    let bundle = ResultBundle::single(ResultSet::name_value([(name.to_lowercase(), value)]));
    if missing {
        bundle.with_warning("Variable not set")
    } else {
        bundle
    }
}

/// Parse and run the command held in `text`
pub(crate) fn run_command<E: QueryExecutor>(
    executor: &mut E,
    variables: &mut Variables,
    active: &ActiveQueryHandle,
    text: &str,
) -> Result<CommandOutput> {
    let command_chars = variables.get("command_chars").unwrap_or_default();
    let command = parse_command(text, &command_chars)?;
    debug!("[SQLSH_COMMAND] {:?}", command);

    let bundle = match command {
        Command::Help(topic) => return Ok(CommandOutput::Message(help_text(topic.as_deref()).to_string())),
        Command::Set { name: None, .. } => ResultBundle::single(ResultSet::name_value(variables.list())),
        Command::Set {
            name: Some(name),
            value: None,
        } => variable_row(&name, variables.get(&name)),
        Command::Set {
            name: Some(name),
            value: Some(value),
        } => {
            variables.set(&name, &value);
            variable_row(&name, Some(value))
        }
        Command::Unset(name) => {
            let removed = variables.unset(&name);
            let bundle = variable_row(&name, variables.get(&name));
            if removed {
                bundle
            } else {
                bundle.with_warning(format!("No session value for {}", name.to_lowercase()))
            }
        }
        Command::Reconnect(target) => {
            executor.reconnect(target.as_deref())?;
            executor.connection_info()?
        }
        backend => {
            let _guard = active.activate(executor.canceller());
            match backend {
                Command::Catalogs => executor.list_catalogs()?,
                Command::Schemas => executor.list_schemas()?,
                Command::Tables(spec) => executor.list_tables(&spec)?,
                Command::Columns(spec) => executor.list_columns(&spec)?,
                _ => executor.connection_info()?,
            }
        }
    };
    Ok(CommandOutput::Results(bundle))
}
