//! pkgtally CLI entry point
//!
//! Parses arguments, loads configuration, initializes logging, and
//! dispatches to the subcommand handlers.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use tracing::debug;

use pkgtally_core::config::PkgtallyConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli).await?;

    logging::init_tracing(&config.general).map_err(|e| CliError::Config(e.to_string()))?;
    debug!(config = %cli.config.display(), "configuration loaded");

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Scan(args) => commands::scan::execute(args, &config, &writer).await,
        Commands::Containers => commands::containers::execute(&config, &writer).await,
        Commands::Formats => commands::formats::execute(&writer),
    }
}

/// Load configuration from the given file, falling back to defaults when
/// the default config path does not exist. An explicitly passed path that
/// is missing is still an error.
async fn load_config(cli: &Cli) -> Result<PkgtallyConfig, CliError> {
    let mut config = if cli.config.exists() {
        PkgtallyConfig::load(&cli.config)
            .await
            .map_err(|e| CliError::Config(e.to_string()))?
    } else if cli.config == std::path::Path::new("pkgtally.toml") {
        let mut config = PkgtallyConfig::default();
        config.apply_env_overrides();
        config
    } else {
        return Err(CliError::Config(format!(
            "config file not found: {}",
            cli.config.display()
        )));
    };

    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
    }

    config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(config)
}
