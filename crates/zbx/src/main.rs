use clap::Parser;
use std::io;
use std::process::ExitCode;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::{connection_config, load_config};
use commands::query::{self, ItemsOptions, TriggersOptions};
use commands::CommandContext;
use zabbix_api_rs::query::ShowTriggers;
use zabbix_cache_rs::ItemOptions;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": e.code(),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise warnings only, or debug output for
/// the zbx crates with `--verbose`.
fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "zbx=debug,zabbix_api_rs=debug,zabbix_cache_rs=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(verbose)
        .init();
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let mut ctx = CommandContext::from_cli(cli);

    match &cli.command {
        Commands::Completions { shell } => {
            Ok(commands::completions::execute(shell, &mut io::stdout())?)
        }
        Commands::Config { command } => match command.as_ref().unwrap_or(&ConfigCommands::Show) {
            ConfigCommands::Show => commands::config::execute_show(&ctx),
            ConfigCommands::Path => commands::config::execute_path(&ctx),
            ConfigCommands::Init { force } => commands::config::execute_init(&ctx, *force),
        },
        Commands::Groups { group } => {
            let resolver = connect(cli, &mut ctx)?;
            query::execute_groups(&ctx, &resolver, group).await
        }
        Commands::Hosts { group, host } => {
            let resolver = connect(cli, &mut ctx)?;
            query::execute_hosts(&ctx, &resolver, group, host).await
        }
        Commands::Apps { filters } => {
            let resolver = connect(cli, &mut ctx)?;
            query::execute_apps(&ctx, &resolver, filters).await
        }
        Commands::Items {
            filters,
            item,
            item_type,
            show_disabled,
        } => {
            let resolver = connect(cli, &mut ctx)?;
            let opts = ItemsOptions {
                filters,
                item,
                options: ItemOptions {
                    itemtype: (*item_type).into(),
                    show_disabled_items: *show_disabled,
                },
            };
            query::execute_items(&ctx, &resolver, &opts).await
        }
        Commands::Triggers {
            filters,
            problems,
            hide_maintenance,
        } => {
            let resolver = connect(cli, &mut ctx)?;
            let opts = TriggersOptions {
                filters,
                show_triggers: if *problems {
                    ShowTriggers::Problems
                } else {
                    ShowTriggers::All
                },
                hide_maintenance: *hide_maintenance,
            };
            query::execute_triggers(&ctx, &resolver, &opts).await
        }
        Commands::Version => {
            let resolver = connect(cli, &mut ctx)?;
            query::execute_version(&ctx, &resolver).await
        }
    }
}

/// Loads the config file, applies its output settings and connects.
///
/// Flags and env vars override the file.
fn connect(cli: &Cli, ctx: &mut CommandContext) -> commands::Result<query::Resolver> {
    let config = load_config()?;
    if config.output.color == Some(false) {
        ctx.use_colors = false;
    }
    let connection = connection_config(cli, &config)?;
    tracing::debug!(url = %connection.url, ttl = ?connection.cache_ttl, "connecting");
    query::connect(&connection)
}
