use clap::Parser;
use std::path::PathBuf;

/// sqlsh - Interactive SQL shell
#[derive(Parser, Debug)]
#[command(name = "sqlsh")]
#[command(version)]
#[command(about = "Action-driven SQL shell for SQLite databases", long_about = None)]
pub struct Cli {
    /// Database file to open
    #[arg(default_value = ":memory:")]
    pub database: String,

    /// Execute statements and exit
    #[arg(short = 'c', long = "command", conflicts_with = "file")]
    pub command: Option<String>,

    /// Execute statements from file and exit
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Configuration file path (default: ~/.sqlsh/config.toml)
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Default output format code (g, G, C, T, L, F)
    #[arg(long = "format")]
    pub format: Option<char>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Do not read or write the history file
    #[arg(long = "no-history")]
    pub no_history: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}
