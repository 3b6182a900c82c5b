//! CLI entry point - the composition root.
//!
//! Loads `.env`, parses arguments, sets up logging and dispatches to a
//! handler. Every failure ends up here and is turned into an exit code.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use luapick_cli::{Cli, Commands, Settings, exit_code_for, handlers};

/// Log to stderr so stdout carries only command output.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok(); // Ignore error if already initialized
}

async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let settings = Settings::from_process_env(&cli)?;

    match cli.command.unwrap_or_default() {
        Commands::Resolve { format } => {
            handlers::resolve::execute(&settings, format).await?;
            Ok(0)
        }
        Commands::Run { args } => handlers::run::execute(&settings, &args).await,
        Commands::List => {
            handlers::list::execute(&settings).await?;
            Ok(0)
        }
    }
}

#[tokio::main]
async fn main() {
    // Before parsing, so clap's `env` bindings see `.env` values too
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("luapick: {err:#}");
            exit_code_for(&err)
        }
    };
    std::process::exit(code);
}
