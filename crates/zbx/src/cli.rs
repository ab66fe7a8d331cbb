//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the zbx CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};
use zabbix_api_rs::query::ItemType;

/// zbx - Query Zabbix inventory and triggers
#[derive(Parser, Debug)]
#[command(name = "zbx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Zabbix API endpoint, e.g. https://zabbix.example.com/api_jsonrpc.php
    #[arg(long, global = true, env = "ZBX_URL")]
    pub url: Option<String>,

    /// User name for password authentication
    #[arg(long, global = true, env = "ZBX_USER")]
    pub user: Option<String>,

    /// Password for password authentication
    #[arg(long, global = true, env = "ZBX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// API token (takes precedence over user/password)
    #[arg(long, global = true, env = "ZBX_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Name filters shared by the query commands.
///
/// Each filter is an exact name or a `/regex/flags` pattern.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Host group filter
    #[arg(short, long, default_value = "")]
    pub group: String,

    /// Host filter
    #[arg(short = 'H', long, default_value = "")]
    pub host: String,

    /// Application filter
    #[arg(short, long, default_value = "")]
    pub app: String,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List host groups
    #[command(alias = "g")]
    Groups {
        /// Host group filter
        #[arg(short, long, default_value = "")]
        group: String,
    },

    /// List hosts
    #[command(alias = "h")]
    Hosts {
        /// Host group filter
        #[arg(short, long, default_value = "")]
        group: String,

        /// Host filter
        #[arg(short = 'H', long, default_value = "")]
        host: String,
    },

    /// List applications
    #[command(alias = "a")]
    Apps {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List items with user macros expanded
    #[command(alias = "i")]
    Items {
        #[command(flatten)]
        filters: FilterArgs,

        /// Item filter
        #[arg(short, long, default_value = "")]
        item: String,

        /// Restrict to a value-type family
        #[arg(long = "type", value_enum, default_value = "all")]
        item_type: ItemTypeArg,

        /// Include disabled items
        #[arg(long)]
        show_disabled: bool,
    },

    /// List triggers
    #[command(alias = "t")]
    Triggers {
        #[command(flatten)]
        filters: FilterArgs,

        /// Only triggers in problem state
        #[arg(long)]
        problems: bool,

        /// Skip hosts in maintenance
        #[arg(long)]
        hide_maintenance: bool,
    },

    /// Show the Zabbix API version
    Version,

    /// View and create configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Item value-type families for `items --type`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemTypeArg {
    All,
    Numeric,
    Text,
}

impl From<ItemTypeArg> for ItemType {
    fn from(arg: ItemTypeArg) -> Self {
        match arg {
            ItemTypeArg::All => ItemType::All,
            ItemTypeArg::Numeric => ItemType::Numeric,
            ItemTypeArg::Text => ItemType::Text,
        }
    }
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print config file path
    Path,

    /// Write a commented default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
