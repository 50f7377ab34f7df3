//! depchain - incremental builds of git-hosted CMake dependency chains
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use depchain::cli::{Cli, Commands, LogFormat};
use depchain::config::ConfigManager;
use depchain::error::DepchainResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> DepchainResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    let format = cli
        .log_format
        .unwrap_or_else(|| LogFormat::from_config(&config.general.log_format));
    init_logging(cli.verbose, format);
    debug!("Using chain file {}", config_manager.path().display());

    let path = config_manager.path();
    match cli.command {
        Commands::Build(args) => depchain::cli::commands::build(args, &config, path).await,
        Commands::Status(args) => depchain::cli::commands::status(args, &config, path).await,
        Commands::Invalidate(args) => {
            depchain::cli::commands::invalidate(args, &config, path).await
        }
        Commands::Plan(args) => depchain::cli::commands::plan(args, &config, path).await,
    }
}

/// 0 = warn (spinners only), 1 = info, 2+ = debug; `RUST_LOG` wins when set
fn init_logging(verbose: u8, format: LogFormat) {
    let default = match verbose {
        0 => "depchain=warn",
        1 => "depchain=info",
        _ => "depchain=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.without_time().init(),
    }
}
