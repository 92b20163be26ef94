//! Error types for the folio MCP server with MCP error code mapping

use rmcp::model::{ErrorCode, ErrorData};
use serde_json::json;
use thiserror::Error;

/// JSON-RPC parse error
pub const PARSE_ERROR: i32 = -32700;
/// JSON-RPC invalid request
pub const INVALID_REQUEST: i32 = -32600;
/// JSON-RPC method not found
pub const METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC invalid params
pub const INVALID_PARAMS: i32 = -32602;
/// JSON-RPC internal error
pub const INTERNAL_ERROR: i32 = -32603;
/// MCP resource not found
pub const RESOURCE_NOT_FOUND: i32 = -32002;

/// Errors that can occur in the MCP server
#[derive(Debug, Error)]
pub enum McpError {
    /// A library operation failed
    #[error(transparent)]
    Core(#[from] folio_core::Error),

    /// JSON serialization error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Protocol error
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParams(String),

    /// Tool name is not one this server exposes
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

impl McpError {
    /// Map error to MCP error code
    pub const fn error_code(&self) -> i32 {
        match self {
            Self::Core(err) => match err {
                folio_core::Error::NotFound(_) | folio_core::Error::SectionNotFound { .. } => {
                    RESOURCE_NOT_FOUND
                },
                folio_core::Error::InvalidRange { .. }
                | folio_core::Error::InvalidPattern(_)
                | folio_core::Error::InvalidArgument(_) => INVALID_PARAMS,
                _ => INTERNAL_ERROR,
            },
            Self::Json(_) => PARSE_ERROR,
            Self::Protocol(_) => INVALID_REQUEST,
            Self::Internal(_) => INTERNAL_ERROR,
            Self::InvalidParams(_) => INVALID_PARAMS,
            Self::UnknownTool(_) => METHOD_NOT_FOUND,
        }
    }
}

impl From<anyhow::Error> for McpError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<McpError> for ErrorData {
    fn from(err: McpError) -> Self {
        let data = match &err {
            McpError::Core(folio_core::Error::SectionNotFound { suggestions, .. }) => {
                Some(json!({ "availableSections": suggestions }))
            },
            McpError::Core(folio_core::Error::InvalidRange { requested, total }) => {
                Some(json!({ "requested": requested, "totalPages": total }))
            },
            _ => None,
        };
        Self::new(ErrorCode(err.error_code()), err.to_string(), data)
    }
}

/// Result type alias for MCP operations
pub type McpResult<T> = Result<T, McpError>;
