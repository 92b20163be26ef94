//! `folio serve`: MCP server over stdio

use anyhow::Result;
use folio_core::{Config, Library};

/// Run the MCP server until stdin closes.
///
/// Documents listed in the registry are reloaded before serving.
pub async fn execute(config: Config) -> Result<()> {
    let library = Library::new(config)?;
    folio_mcp::serve_stdio(library).await?;
    Ok(())
}
