//! Command-line entry point for metadux.
//!
//! The `metadux` binary drives a [`MetaStore`](metadux_core::MetaStore) from
//! files: replay a recorded action log, read a path, merge assignments, or
//! list the leaf paths of a tree. Results go to stdout as JSON; logs go to
//! stderr.
//!
//! # Usage
//!
//! ```text
//! metadux replay --actions actions.json [--state meta.json]
//! metadux get --state meta.json other.2.key [--default '"none"']
//! metadux set [--state meta.json] user.name=ada layout.columns=[1,2]
//! metadux keys meta.json
//! ```

mod cli;
mod commands;
mod error;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use metadux_core::MetaduxConfig;
use metadux_core::config::LoggingConfig;

use crate::cli::Cli;
use crate::error::CliError;

/// Application entry point.
///
/// Parses arguments, loads configuration, initializes logging, then runs the
/// selected command and prints its output.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the command fails.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli).context("loading configuration")?;

    init_logging(&config.logging);
    info!(
        config = ?cli.config,
        level = %config.logging.level,
        "metadux starting"
    );

    let output = commands::execute(&cli.command, &config).context("running command")?;
    println!("{output}");
    Ok(())
}

fn load_config(cli: &Cli) -> Result<MetaduxConfig, CliError> {
    match &cli.config {
        Some(path) => Ok(MetaduxConfig::from_file(path)?),
        None => {
            let mut config = MetaduxConfig::default();
            config.logging.apply_env_overrides();
            Ok(config)
        }
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
