//! MCP tools for folio

pub mod documents;
pub mod query;

pub use documents::{
    DocumentIdParams, DocumentOutlineOutput, ListDocumentsOutput, ListDocumentsParams,
    LoadDocumentParams, UnloadDocumentOutput, handle_document_info, handle_document_outline,
    handle_list_documents, handle_load_document, handle_unload_document,
};
pub use query::{
    ReadSectionParams, SearchDocumentOutput, SearchDocumentParams, handle_read_section,
    handle_search_document,
};
