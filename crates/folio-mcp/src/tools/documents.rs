//! Document lifecycle tools: load, list, inspect, unload

use folio_core::{DocumentInfo, DocumentSummary, Library, LoadOutcome};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{McpError, McpResult};

/// Parameters for `load_document`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadDocumentParams {
    /// Local file path or http(s) URL of the PDF
    pub path: String,
}

/// Parameters for tools addressing one loaded document
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentIdParams {
    /// Document id returned by `load_document`
    pub id: String,
}

/// Parameters for `list_documents` (none)
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsParams {}

/// Output from `document_outline`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOutlineOutput {
    pub id: String,
    /// Indented outline, one entry per line
    pub outline: String,
}

/// Output from `list_documents`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsOutput {
    pub documents: Vec<DocumentSummary>,
}

/// Output from `unload_document`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnloadDocumentOutput {
    pub id: String,
    /// False when no document was loaded under `id`
    pub unloaded: bool,
}

fn require(value: &str, name: &str) -> McpResult<()> {
    if value.trim().is_empty() {
        return Err(McpError::InvalidParams(format!("{name} cannot be empty")));
    }
    Ok(())
}

/// Handle `load_document`
#[tracing::instrument(skip(library))]
pub async fn handle_load_document(
    params: &LoadDocumentParams,
    library: &Library,
) -> McpResult<LoadOutcome> {
    require(&params.path, "path")?;
    Ok(library.load(&params.path).await?)
}

/// Handle `document_outline`
#[tracing::instrument(skip(library))]
pub async fn handle_document_outline(
    params: &DocumentIdParams,
    library: &Library,
) -> McpResult<DocumentOutlineOutput> {
    require(&params.id, "id")?;
    let outline = library.outline(&params.id).await?;
    Ok(DocumentOutlineOutput {
        id: params.id.clone(),
        outline,
    })
}

/// Handle `document_info`
#[tracing::instrument(skip(library))]
pub async fn handle_document_info(
    params: &DocumentIdParams,
    library: &Library,
) -> McpResult<DocumentInfo> {
    require(&params.id, "id")?;
    Ok(library.info(&params.id).await?)
}

/// Handle `list_documents`
pub async fn handle_list_documents(
    _params: &ListDocumentsParams,
    library: &Library,
) -> McpResult<ListDocumentsOutput> {
    Ok(ListDocumentsOutput {
        documents: library.list().await,
    })
}

/// Handle `unload_document`
#[tracing::instrument(skip(library))]
pub async fn handle_unload_document(
    params: &DocumentIdParams,
    library: &Library,
) -> McpResult<UnloadDocumentOutput> {
    require(&params.id, "id")?;
    let unloaded = library.unload(&params.id).await;
    Ok(UnloadDocumentOutput {
        id: params.id.clone(),
        unloaded,
    })
}
