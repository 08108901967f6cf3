//! Logging setup, powered by tracing-subscriber
//!
//! Library code logs through the `log` macros; the subscriber installs the
//! `log` bridge so those records reach the same stderr formatter. Log output
//! never goes to the render sink.

use tracing_subscriber::EnvFilter;

use crate::error::{Result, ShellError};

/// Crates whose debug output drowns the shell's own
const NOISY_TARGETS: &[(&str, &str)] = &[("rustyline", "warn")];

/// Base level for a `-v` count
pub fn verbosity_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Base directive plus noisy-crate overrides
pub fn build_env_filter(level: &str) -> Result<EnvFilter> {
    let mut directives = vec![level.to_string()];
    for (target, lvl) in NOISY_TARGETS {
        directives.push(format!("{}={}", target, lvl));
    }
    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str).map_err(|e| {
        ShellError::Configuration(format!("Invalid log filter '{}': {}", filter_str, e))
    })
}

/// Initialise stderr logging. `RUST_LOG` wins over the `-v` count.
pub fn init_logging(verbose: u8) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_env_filter(verbosity_level(verbose))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| ShellError::Configuration(format!("Failed to initialise logging: {}", e)))
}
