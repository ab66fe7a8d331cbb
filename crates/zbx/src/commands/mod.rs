//! Command implementations for the zbx CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod query;
pub mod suggest;

use std::env;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter resolution error.
    #[error("{0}")]
    Resolver(#[from] zabbix_cache_rs::Error),

    /// Filter parsing error.
    #[error("filter error: {0}")]
    Filter(#[from] zabbix_cache_rs::filter::FilterError),

    /// API error.
    #[error("API error: {0}")]
    Api(#[from] zabbix_api_rs::error::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Returns the error code string for JSON output.
    pub fn code(&self) -> &'static str {
        if let Some(e) = self.api_error() {
            return match e {
                zabbix_api_rs::error::Error::Config(_) => "CONFIG_ERROR",
                e if e.exit_code() == 3 => "NETWORK_ERROR",
                _ => "API_ERROR",
            };
        }
        match self {
            CommandError::Config(_) => "CONFIG_ERROR",
            CommandError::Io(_) => "IO_ERROR",
            CommandError::Json(_) => "JSON_ERROR",
            _ => "FILTER_ERROR",
        }
    }

    /// Returns the process exit code: 2 for API errors, 3 for network
    /// errors, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self.api_error() {
            Some(zabbix_api_rs::error::Error::Config(_)) | None => 1,
            Some(e) if e.exit_code() == 3 => 3,
            Some(_) => 2,
        }
    }

    fn api_error(&self) -> Option<&zabbix_api_rs::error::Error> {
        match self {
            CommandError::Api(e) | CommandError::Resolver(zabbix_cache_rs::Error::Api(e)) => Some(e),
            _ => None,
        }
    }
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    ///
    /// Colors are off with `--no-color` or when `NO_COLOR` is set.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}
