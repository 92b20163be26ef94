//! folio CLI - read and search PDF documents by section
//!
//! One-shot commands load a document, answer a single query and exit.
//! `folio serve` runs the MCP server over stdio with the persistent registry.

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod output;
mod utils;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::logging::initialize_logging(&cli)?;

    execute_command(cli).await
}

async fn execute_command(cli: Cli) -> Result<()> {
    let config = commands::load_config(cli.config.as_deref(), cli.config_dir.as_deref())?;

    match cli.command {
        Commands::Serve => commands::serve::execute(config).await,
        Commands::Outline { locator, format } => {
            commands::outline::execute(config, &locator, format.format).await
        },
        Commands::Section(args) => commands::section::execute(config, args).await,
        Commands::Search(args) => commands::search::execute(config, args).await,
        Commands::Info { locator, format } => {
            commands::info::execute(config, &locator, format.format).await
        },
    }
}
