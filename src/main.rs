//! Binary entry point for linkshelf.
//!
//! This binary provides the CLI interface for the linkshelf bookmark groups.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use linkshelf::cli::{self, Cli};
use linkshelf::observability;
use linkshelf::services::ServiceContainer;
use linkshelf::{Error, ShelfConfig};

fn main() -> ExitCode {
    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, &config) {
        Ok(output) => {
            println!("{output:#}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            let user_facing = e.downcast_ref::<Error>().is_some_and(Error::is_user_facing);
            if !user_facing {
                tracing::error!(error = %format!("{e:#}"), "Command failed");
            }
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Loads the configuration and applies command line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<ShelfConfig> {
    let mut config =
        ShelfConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(database) = &cli.database {
        config.database_path = Some(database.clone());
    }
    Ok(config)
}

/// Runs the selected command.
fn run_command(cli: Cli, config: &ShelfConfig) -> anyhow::Result<serde_json::Value> {
    let owner = cli.owner()?;
    let services = ServiceContainer::open(config).context("failed to open the database")?;
    Ok(cli::execute(cli.command, owner, &services)?)
}
