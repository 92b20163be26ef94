use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One node of a document outline (table of contents).
///
/// Root nodes sit at level 1; the document itself is the implicit level 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub title: String,
    pub level: usize,
    /// 1-based destination page, `None` when the destination did not resolve.
    pub page: Option<usize>,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(title: impl Into<String>, level: usize, page: Option<usize>) -> Self {
        Self {
            title: title.into(),
            level,
            page,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }
}

/// A degraded extraction recorded while loading a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExtractionIssue {
    /// Text extraction failed for a page; the page contributes empty text.
    Page { page: usize, reason: String },
    /// An outline destination did not resolve; the node is kept without a page.
    OutlineNode { title: String, reason: String },
}

/// A loaded document. Immutable once built; replaced or removed as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub locator: String,
    pub page_count: usize,
    pub body: String,
    pub metadata: BTreeMap<String, String>,
    pub outline: Vec<OutlineNode>,
    pub loaded_at: DateTime<Utc>,
    /// Base64 SHA-256 of the source bytes.
    pub checksum: String,
    pub issues: Vec<ExtractionIssue>,
}

impl Document {
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            path: self.locator.clone(),
            page_count: self.page_count,
        }
    }
}

/// Listing entry for a loaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    pub path: String,
    pub page_count: usize,
}

/// Result of `load`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOutcome {
    pub id: String,
    pub page_count: usize,
    /// True when the locator was already loaded and the existing document was reused.
    pub already_loaded: bool,
}

/// Detailed information about a loaded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub id: String,
    pub path: String,
    pub page_count: usize,
    pub metadata: BTreeMap<String, String>,
    pub loaded_at: DateTime<Utc>,
    pub checksum: String,
    pub issues: Vec<ExtractionIssue>,
}

impl From<&Document> for DocumentInfo {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            path: doc.locator.clone(),
            page_count: doc.page_count,
            metadata: doc.metadata.clone(),
            loaded_at: doc.loaded_at,
            checksum: doc.checksum.clone(),
            issues: doc.issues.clone(),
        }
    }
}

/// One page of a paginated section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPage {
    pub page: usize,
    pub total_pages: usize,
    pub content: String,
    pub section: String,
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Matched text exactly as it appears in the body.
    pub text: String,
    pub context: String,
}

/// Search hits attributed to one section, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchGroup {
    pub section: String,
    pub matches: Vec<SearchMatch>,
}
