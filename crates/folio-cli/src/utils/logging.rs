//! Logging initialization.
//!
//! Logs always go to stderr: stdout carries command output, and for
//! `folio serve` it carries the MCP protocol stream.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, Commands};
use crate::output::OutputFormat;

/// Initialize the tracing subscriber based on CLI flags.
///
/// JSON output suppresses everything below errors unless `--verbose` is set.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level_for(cli))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn level_for(cli: &Cli) -> Level {
    if cli.verbose {
        return Level::DEBUG;
    }
    if cli.quiet {
        return Level::ERROR;
    }

    let format = match &cli.command {
        Commands::Outline { format, .. } | Commands::Info { format, .. } => Some(format.format),
        Commands::Section(args) => Some(args.format.format),
        Commands::Search(args) => Some(args.format.format),
        Commands::Serve => None,
    };
    match format {
        Some(OutputFormat::Json) => Level::ERROR,
        Some(OutputFormat::Text) => Level::WARN,
        None => Level::INFO,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    fn level(args: &[&str]) -> Level {
        level_for(&Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn test_levels_follow_flags_and_format() {
        assert_eq!(level(&["folio", "outline", "a.pdf"]), Level::WARN);
        assert_eq!(level(&["folio", "outline", "a.pdf", "-f", "json"]), Level::ERROR);
        assert_eq!(level(&["folio", "-v", "outline", "a.pdf", "-f", "json"]), Level::DEBUG);
        assert_eq!(level(&["folio", "-q", "info", "a.pdf"]), Level::ERROR);
        assert_eq!(level(&["folio", "serve"]), Level::INFO);
    }
}
