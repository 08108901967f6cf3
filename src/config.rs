//! Configuration file and session variables
//!
//! # Configuration Format
//!
//! ```toml
//! [shell]
//! action_chars = "\\;"          # characters that end a statement and start an action
//! command_chars = "*"           # first character of a built-in command
//! default_action = "g"          # action used when a trigger has no explicit code
//! prompt = "{db} {line}> "      # {db} = database name, {line} = buffer line number
//! pager = "less -S"             # command used by a bare `|`
//! editor = "vim"                # optional, falls back to $VISUAL, $EDITOR, vi
//! color = true
//!
//! [history]
//! file = "~/.sqlsh/history"
//! size = 1000
//! ```
//!
//! Shell settings are read through [`Variables`] at every point of use, so
//! `set`/`unset` and `SQLSH_*` environment variables take effect
//! immediately.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShellError};
use crate::segmenter::Triggers;

/// Prefix of environment variables that override shell settings
pub const ENV_PREFIX: &str = "SQLSH_";

/// Shell variables with a configured or built-in value
pub const VARIABLE_NAMES: &[&str] = &[
    "action_chars",
    "color",
    "command_chars",
    "default_action",
    "editor",
    "pager",
    "prompt",
];

/// Fallback editor when neither the variable nor the environment names one
pub const DEFAULT_EDITOR: &str = "vi";

/// CLI configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfiguration {
    /// Shell behaviour
    #[serde(default)]
    pub shell: ShellConfig,

    /// History file settings
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    #[serde(default = "default_action_chars")]
    pub action_chars: String,

    #[serde(default = "default_command_chars")]
    pub command_chars: String,

    #[serde(default = "default_default_action")]
    pub default_action: String,

    #[serde(default = "default_prompt")]
    pub prompt: String,

    #[serde(default = "default_pager")]
    pub pager: String,

    pub editor: Option<String>,

    /// Enable colored output
    #[serde(default = "default_color")]
    pub color: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_file")]
    pub file: String,

    /// Maximum history size
    #[serde(default = "default_history_size")]
    pub size: usize,
}

fn default_action_chars() -> String {
    "\\;".to_string()
}

fn default_command_chars() -> String {
    "*".to_string()
}

fn default_default_action() -> String {
    "g".to_string()
}

fn default_prompt() -> String {
    "{db} {line}> ".to_string()
}

fn default_pager() -> String {
    "less -S".to_string()
}

fn default_color() -> bool {
    true
}

fn default_history_file() -> String {
    "~/.sqlsh/history".to_string()
}

fn default_history_size() -> usize {
    1000
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            action_chars: default_action_chars(),
            command_chars: default_command_chars(),
            default_action: default_default_action(),
            prompt: default_prompt(),
            pager: default_pager(),
            editor: None,
            color: default_color(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            file: default_history_file(),
            size: default_history_size(),
        }
    }
}

pub fn expand_config_path(path: &Path) -> PathBuf {
    let path_str = path.to_str().unwrap_or("~/.sqlsh/config.toml");
    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(rest);
        }
    }
    path.to_path_buf()
}

pub fn default_config_path() -> PathBuf {
    expand_config_path(Path::new("~/.sqlsh/config.toml"))
}

impl CliConfiguration {
    /// Load configuration from file
    ///
    /// Returns default configuration if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        let expanded_path = expand_config_path(path);
        let path = &expanded_path;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            ShellError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: CliConfiguration = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Expanded history file path
    pub fn history_path(&self) -> PathBuf {
        expand_config_path(Path::new(&self.history.file))
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Session variables: runtime override, then `SQLSH_<NAME>` environment
/// variable, then configuration file, then built-in default.
pub struct Variables {
    config: ShellConfig,
    overrides: BTreeMap<String, String>,
    env: EnvLookup,
}

impl fmt::Debug for Variables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variables")
            .field("config", &self.config)
            .field("overrides", &self.overrides)
            .finish()
    }
}

impl Variables {
    /// Variables backed by the process environment
    pub fn new(config: ShellConfig) -> Self {
        Self::with_env(config, |key| std::env::var(key).ok())
    }

    /// Variables with a custom environment lookup
    pub fn with_env<F>(config: ShellConfig, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        Self {
            config,
            overrides: BTreeMap::new(),
            env: Box::new(env),
        }
    }

    fn configured(&self, name: &str) -> Option<String> {
        match name {
            "action_chars" => Some(self.config.action_chars.clone()),
            "command_chars" => Some(self.config.command_chars.clone()),
            "default_action" => Some(self.config.default_action.clone()),
            "prompt" => Some(self.config.prompt.clone()),
            "pager" => Some(self.config.pager.clone()),
            "editor" => self.config.editor.clone(),
            "color" => Some(self.config.color.to_string()),
            _ => None,
        }
    }

    /// Current value of a variable
    pub fn get(&self, name: &str) -> Option<String> {
        let name = name.to_lowercase();
        if let Some(value) = self.overrides.get(&name) {
            return Some(value.clone());
        }
        if let Some(value) = (self.env)(&format!("{}{}", ENV_PREFIX, name.to_uppercase())) {
            return Some(value);
        }
        self.configured(&name)
    }

    /// Override a variable for the rest of the session
    pub fn set(&mut self, name: &str, value: &str) {
        self.overrides.insert(name.to_lowercase(), value.to_string());
    }

    /// Drop a runtime override; returns whether one existed
    pub fn unset(&mut self, name: &str) -> bool {
        self.overrides.remove(&name.to_lowercase()).is_some()
    }

    /// Every known variable and its current value, sorted by name
    pub fn list(&self) -> Vec<(String, Option<String>)> {
        let mut names: Vec<String> = VARIABLE_NAMES.iter().map(|n| n.to_string()).collect();
        for name in self.overrides.keys() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names.sort();
        names
            .into_iter()
            .map(|name| {
                let value = self.get(&name);
                (name, value)
            })
            .collect()
    }

    pub fn triggers(&self) -> Triggers {
        Triggers::new(
            self.get("action_chars").unwrap_or_default(),
            self.get("command_chars").unwrap_or_default(),
            self.default_action(),
        )
    }

    /// Action code used when a trigger carries no explicit code
    pub fn default_action(&self) -> char {
        self.get("default_action")
            .and_then(|v| v.chars().next())
            .unwrap_or('g')
    }

    pub fn prompt_template(&self) -> String {
        self.get("prompt").unwrap_or_else(default_prompt)
    }

    pub fn pager(&self) -> String {
        self.get("pager").unwrap_or_default()
    }

    pub fn color(&self) -> bool {
        match self.get("color") {
            Some(v) => matches!(v.to_lowercase().as_str(), "true" | "1" | "yes" | "on"),
            None => default_color(),
        }
    }

    /// Editor command: variable, then `$VISUAL`, then `$EDITOR`, then `vi`
    pub fn editor(&self) -> String {
        self.get("editor")
            .filter(|e| !e.trim().is_empty())
            .or_else(|| (self.env)("VISUAL").filter(|e| !e.trim().is_empty()))
            .or_else(|| (self.env)("EDITOR").filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
    }
}
