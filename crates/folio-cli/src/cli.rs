//! Command-line interface definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::FormatArg;

#[derive(Parser, Clone, Debug)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Read and search PDF documents by section", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file (overrides the default lookup)
    #[arg(long, global = true, env = "FOLIO_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory containing config.toml
    #[arg(long, global = true, env = "FOLIO_CONFIG_DIR", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Run the MCP server over stdio
    Serve,

    /// Show the table of contents of a document
    #[command(alias = "toc")]
    Outline {
        /// PDF file path or http(s) URL
        locator: String,

        #[command(flatten)]
        format: FormatArg,
    },

    /// Read one page of a section
    Section(SectionArgs),

    /// Search a document for text or a regular expression
    Search(SearchArgs),

    /// Show document metadata and extraction issues
    Info {
        /// PDF file path or http(s) URL
        locator: String,

        #[command(flatten)]
        format: FormatArg,
    },
}

#[derive(Args, Clone, Debug)]
pub struct SectionArgs {
    /// PDF file path or http(s) URL
    pub locator: String,

    /// Heading title, or a case-insensitive part of it
    pub title: String,

    /// Page of the section to show (1-based)
    #[arg(long, short = 'p', value_parser = clap::value_parser!(u64).range(1..))]
    pub page: Option<u64>,

    /// Characters per page (defaults to the configured budget)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub budget: Option<u64>,

    #[command(flatten)]
    pub format: FormatArg,
}

#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    /// PDF file path or http(s) URL
    pub locator: String,

    /// Text or pattern to search for
    pub query: String,

    /// Treat the query as a regular expression
    #[arg(long, short = 'r')]
    pub regex: bool,

    /// Match case exactly
    #[arg(long, short = 's')]
    pub case_sensitive: bool,

    /// Maximum number of matches
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Characters of context on each side of a match
    #[arg(long)]
    pub context: Option<usize>,

    #[command(flatten)]
    pub format: FormatArg,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_flags() {
        let cli = Cli::try_parse_from([
            "folio", "search", "doc.pdf", "wid.*", "--regex", "-n", "5", "--format", "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert!(args.regex);
                assert!(!args.case_sensitive);
                assert_eq!(args.limit, Some(5));
                assert_eq!(args.format.format, OutputFormat::Json);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_section_page_must_be_positive() {
        let result = Cli::try_parse_from(["folio", "section", "doc.pdf", "Intro", "--page", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_outline_alias_and_default_format() {
        let cli = Cli::try_parse_from(["folio", "toc", "doc.pdf"]).unwrap();
        match cli.command {
            Commands::Outline { locator, format } => {
                assert_eq!(locator, "doc.pdf");
                assert_eq!(format.format, OutputFormat::Text);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["folio", "-v", "-q", "serve"]).is_err());
    }
}
