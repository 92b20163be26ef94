//! MCP server implementation for folio

use std::sync::Arc;

use folio_core::Library;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{McpError, McpResult};
use crate::tools;

const LOAD_DOCUMENT: &str = "load_document";
const READ_SECTION: &str = "read_section";
const SEARCH_DOCUMENT: &str = "search_document";
const DOCUMENT_OUTLINE: &str = "document_outline";
const DOCUMENT_INFO: &str = "document_info";
const LIST_DOCUMENTS: &str = "list_documents";
const UNLOAD_DOCUMENT: &str = "unload_document";

const INSTRUCTIONS: &str = "Load a PDF with load_document, then use document_outline to see its \
structure, read_section to read a section page by page, and search_document to find text.";

/// MCP server for folio
#[derive(Clone)]
pub struct McpServer {
    library: Library,
    tools: Arc<Vec<Tool>>,
}

fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(schema) {
        Ok(Value::Object(map)) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

fn tool_definitions() -> Vec<Tool> {
    vec![
        Tool::new(
            LOAD_DOCUMENT,
            "Load a PDF from a file path or URL and return its document id. \
             Loading the same source again returns the existing id.",
            input_schema::<tools::LoadDocumentParams>(),
        ),
        Tool::new(
            READ_SECTION,
            "Read one page of a section, located by (partial) heading title. \
             Long sections are split into pages at paragraph boundaries.",
            input_schema::<tools::ReadSectionParams>(),
        ),
        Tool::new(
            SEARCH_DOCUMENT,
            "Search a loaded document for text or a regular expression. \
             Matches are grouped by the section they appear in.",
            input_schema::<tools::SearchDocumentParams>(),
        ),
        Tool::new(
            DOCUMENT_OUTLINE,
            "Show the table of contents of a loaded document with page numbers.",
            input_schema::<tools::DocumentIdParams>(),
        ),
        Tool::new(
            DOCUMENT_INFO,
            "Show metadata, page count and extraction issues of a loaded document.",
            input_schema::<tools::DocumentIdParams>(),
        ),
        Tool::new(
            LIST_DOCUMENTS,
            "List loaded documents in load order.",
            input_schema::<tools::ListDocumentsParams>(),
        ),
        Tool::new(
            UNLOAD_DOCUMENT,
            "Unload a document and forget it across restarts.",
            input_schema::<tools::DocumentIdParams>(),
        ),
    ]
}

fn parse<T: DeserializeOwned>(arguments: JsonObject) -> McpResult<T> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| McpError::InvalidParams(e.to_string()))
}

fn to_value<T: Serialize>(output: &T) -> McpResult<Value> {
    Ok(serde_json::to_value(output)?)
}

impl McpServer {
    /// Create a server over `library`
    pub fn new(library: Library) -> Self {
        Self {
            library,
            tools: Arc::new(tool_definitions()),
        }
    }

    pub const fn library(&self) -> &Library {
        &self.library
    }

    /// Tools exposed by this server
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Run the named tool and return its JSON output
    pub async fn dispatch(&self, name: &str, arguments: JsonObject) -> McpResult<Value> {
        let library = &self.library;
        match name {
            LOAD_DOCUMENT => {
                to_value(&tools::handle_load_document(&parse(arguments)?, library).await?)
            },
            READ_SECTION => {
                to_value(&tools::handle_read_section(&parse(arguments)?, library).await?)
            },
            SEARCH_DOCUMENT => {
                to_value(&tools::handle_search_document(&parse(arguments)?, library).await?)
            },
            DOCUMENT_OUTLINE => {
                to_value(&tools::handle_document_outline(&parse(arguments)?, library).await?)
            },
            DOCUMENT_INFO => {
                to_value(&tools::handle_document_info(&parse(arguments)?, library).await?)
            },
            LIST_DOCUMENTS => {
                to_value(&tools::handle_list_documents(&parse(arguments)?, library).await?)
            },
            UNLOAD_DOCUMENT => {
                to_value(&tools::handle_unload_document(&parse(arguments)?, library).await?)
            },
            other => Err(McpError::UnknownTool(other.to_string())),
        }
    }

    /// Serve the MCP protocol over stdio
    pub async fn serve_stdio(&self) -> McpResult<()> {
        tracing::info!("folio MCP server starting");

        let stdin = tokio::io::stdin();
        let stdout = tokio::io::stdout();

        let service = rmcp::serve_server(self.clone(), (stdin, stdout))
            .await
            .map_err(|e| {
                tracing::error!("server initialization error: {}", e);
                McpError::Protocol(e.to_string())
            })?;

        // Keep the service running until it's cancelled
        service.waiting().await.map_err(|e| {
            tracing::error!("server runtime error: {}", e);
            McpError::Protocol(e.to_string())
        })?;

        tracing::info!("folio MCP server stopped");
        Ok(())
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "folio-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools.to_vec()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = request.arguments.unwrap_or_default();
        tracing::debug!(tool = %request.name, "tool call");

        let output = self.dispatch(&request.name, arguments).await.map_err(|e| {
            tracing::warn!(tool = %request.name, error = %e, "tool call failed");
            ErrorData::from(e)
        })?;
        let text = serde_json::to_string_pretty(&output)
            .map_err(|e| ErrorData::from(McpError::Json(e)))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}
