//! sqlsh - action-driven SQL shell
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode on a database file
//! sqlsh app.db
//!
//! # Run statements and exit
//! sqlsh app.db -c "SELECT * FROM users\G"
//!
//! # Run a script, CSV output by default
//! sqlsh app.db --format C -f report.sql
//! ```

use clap::Parser;
use log::{debug, info};

use sqlsh::cancel::CancellationController;
use sqlsh::config::default_config_path;
use sqlsh::history::CommandHistory;
use sqlsh::logging::init_logging;
use sqlsh::session::{RustylineReader, ScriptReader};
use sqlsh::{CliConfiguration, Result, Session, ShellError, SqliteExecutor, Variables};

mod args;

use args::Cli;

fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = CliConfiguration::load(&config_path)?;
    debug!("[SQLSH_MAIN] Loaded configuration from {}", config_path.display());

    let mut variables = Variables::new(config.shell.clone());
    if let Some(code) = cli.format {
        variables.set("default_action", &code.to_string());
    }
    if cli.no_color {
        variables.set("color", "false");
        colored::control::set_override(false);
    }

    let executor = SqliteExecutor::open(&cli.database)?;
    info!("[SQLSH_MAIN] Opened {}", cli.database);

    let mut session = Session::new(executor, variables);
    let history = if cli.no_history {
        None
    } else {
        Some(CommandHistory::with_path(config.history_path(), config.history.size))
    };

    let mut cancel = CancellationController::spawn(session.active_query())?;
    cancel.install_interrupt_handler()?;

    // Execute based on mode
    match (cli.file, cli.command) {
        (Some(file), None) => {
            let script = std::fs::read_to_string(&file).map_err(|e| {
                ShellError::File(format!("Failed to read {}: {}", file.display(), e))
            })?;
            session.run_script(&mut ScriptReader::new(&script))?;
        }

        (None, Some(command)) => {
            session.run_script(&mut ScriptReader::new(&command))?;
        }

        (None, None) => {
            let entries = match &history {
                Some(history) => history.load().unwrap_or_default(),
                None => Vec::new(),
            };
            let mut reader = RustylineReader::new(&entries)?;
            if let Some(history) = history {
                session = session.with_history(history);
            }
            session.show_connection_info();
            session.run(&mut reader)?;
        }

        (Some(_), Some(_)) => {
            return Err(ShellError::Configuration(
                "Cannot specify both --file and --command".into(),
            ));
        }
    }

    cancel.shutdown();
    Ok(())
}
