//! folio MCP server
//!
//! Exposes a [`folio_core::Library`] as MCP tools over stdio: load PDFs, read
//! their sections page by page, search them, and inspect their outline and
//! metadata.

pub mod error;
pub mod server;
pub mod tools;

pub use error::{McpError, McpResult};
pub use server::McpServer;

use folio_core::Library;

/// Replay the persisted registry, then serve MCP over stdio until the client
/// disconnects.
///
/// Tracing must be initialized by the caller and write to stderr; stdout is
/// the transport.
///
/// # Errors
///
/// Returns an error if the registry cannot be read or the server fails to run.
pub async fn serve_stdio(library: Library) -> McpResult<()> {
    tracing::debug!("initializing folio MCP server");

    let report = library.restore().await?;
    if !report.is_clean() {
        tracing::warn!(
            failed = report.failed.len(),
            "some registered documents could not be restored"
        );
    }

    McpServer::new(library).serve_stdio().await
}
