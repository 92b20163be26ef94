//! Query tools: paginated section reads and full-text search

use folio_core::{Library, SearchGroup, SearchRequest, SectionPage};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::McpResult;

/// Parameters for `read_section`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadSectionParams {
    /// Document id returned by `load_document`
    pub id: String,
    /// Section title; partial, case-insensitive matches are accepted
    pub section: String,
    /// 1-based page of the section (default 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    /// Maximum characters per page (default from configuration)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_budget: Option<usize>,
}

/// Parameters for `search_document`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocumentParams {
    /// Document id returned by `load_document`
    pub id: String,
    /// Text or regular expression to search for
    pub query: String,
    /// Match case exactly (default false)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
    /// Interpret `query` as a regular expression (default false)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<bool>,
    /// Stop after this many matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
    /// Characters of context on each side of a match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_chars: Option<usize>,
}

/// Output from `search_document`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocumentOutput {
    pub id: String,
    pub query: String,
    pub total_matches: usize,
    pub groups: Vec<SearchGroup>,
}

/// Handle `read_section`
#[tracing::instrument(skip(library))]
pub async fn handle_read_section(
    params: &ReadSectionParams,
    library: &Library,
) -> McpResult<SectionPage> {
    Ok(library
        .section(&params.id, &params.section, params.page, params.char_budget)
        .await?)
}

/// Handle `search_document`
#[tracing::instrument(skip(library))]
pub async fn handle_search_document(
    params: &SearchDocumentParams,
    library: &Library,
) -> McpResult<SearchDocumentOutput> {
    let request = SearchRequest {
        query: params.query.clone(),
        case_sensitive: params.case_sensitive,
        regex: params.regex,
        max_results: params.max_results,
        context_chars: params.context_chars,
    };
    let groups = library.search(&params.id, request).await?;
    let total_matches = groups.iter().map(|g| g.matches.len()).sum();

    tracing::debug!(total_matches, sections = groups.len(), "search_document complete");

    Ok(SearchDocumentOutput {
        id: params.id.clone(),
        query: params.query.clone(),
        total_matches,
        groups,
    })
}
