//! PlaceGuide CLI - Command-line interface
//!
//! This is the command-line adapter for the PlaceGuide quality engine.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod export;
mod output;
mod output_types;

use clap::Parser;
use cli::Cli;
use output::OutputWriter;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let json = cli.json;

    // Execute the command
    match commands::execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let cli_error = errors::from_anyhow(error);
            OutputWriter::new(json).error(&cli_error);
            ExitCode::FAILURE
        }
    }
}
