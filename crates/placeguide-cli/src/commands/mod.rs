//! Command implementations

mod categories;
mod config;
mod distance;
mod evaluate;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    match cli.command {
        Commands::Evaluate(args) => evaluate::execute(args, &output, cli.explain),
        Commands::Categories(args) => categories::execute(args, &output),
        Commands::Distance(args) => distance::execute(args, &output),
        Commands::Config(args) => config::execute(args, &output),
    }
}
