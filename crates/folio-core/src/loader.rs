//! Document acquisition and boundary validation.
//!
//! The loader reads source bytes (file or URL), hands them to a
//! [`DocumentDecoder`], and narrows the decoder's loosely typed output into a
//! [`Document`]: outline destinations are range-checked, blank titles are
//! replaced, and metadata values are flattened to strings. Anything that had to
//! be degraded is recorded in [`Document::issues`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::FetchConfig;
use crate::decode::{
    DecodeContext, DecodedDocument, DocumentDecoder, PageExtraction, RawDestination, RawOutlineItem,
};
use crate::fetcher::Fetcher;
use crate::locator::NormalizedLocator;
use crate::synth;
use crate::types::{Document, ExtractionIssue, OutlineNode};
use crate::{Error, Result};

/// Title given to outline nodes whose title is missing or blank.
pub const UNTITLED: &str = "Untitled";

/// Builds [`Document`]s from locators.
#[derive(Clone)]
pub struct Loader {
    fetcher: Fetcher,
    decoder: Arc<dyn DocumentDecoder>,
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("fetcher", &self.fetcher)
            .finish_non_exhaustive()
    }
}

impl Loader {
    pub fn new(config: &FetchConfig, decoder: Arc<dyn DocumentDecoder>) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(config)?,
            decoder,
        })
    }

    pub const fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Raw bytes behind `locator`.
    async fn read_source(&self, locator: &NormalizedLocator) -> Result<Vec<u8>> {
        if locator.is_url {
            return self.fetcher.fetch(&locator.normalized).await;
        }

        let path = Path::new(&locator.normalized);
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::NotFound(format!(
                "File '{}' does not exist",
                path.display()
            ))),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Read, decode and synthesize the document at `locator` under `id`.
    pub async fn load(&self, id: &str, locator: &NormalizedLocator) -> Result<Document> {
        let started = Instant::now();
        let bytes = self.read_source(locator).await?;

        // Remote loads share one deadline between the fetch and the decode.
        let timeout = self.fetcher.timeout();
        let deadline = locator.is_url.then(|| started + timeout);
        let ctx = DecodeContext::new(locator.normalized.clone(), timeout, deadline);

        let decoded = self.decoder.decode(&bytes, &ctx)?;
        let document = build_document(id, locator, &bytes, decoded);

        info!(
            id,
            pages = document.page_count,
            issues = document.issues.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "document loaded"
        );
        Ok(document)
    }
}

/// Base64-encoded SHA-256 of `bytes`.
pub fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    STANDARD.encode(hasher.finalize())
}

/// Convert a decoder result into a validated [`Document`].
pub fn build_document(
    id: &str,
    locator: &NormalizedLocator,
    bytes: &[u8],
    decoded: DecodedDocument,
) -> Document {
    let page_count = decoded.page_count();
    let mut issues = Vec::new();

    let pages = convert_pages(decoded.pages, &mut issues);
    let outline = convert_outline(decoded.outline, page_count, &mut issues);
    let metadata = convert_metadata(decoded.metadata);
    let body = synth::synthesize(&pages, &outline);

    debug!(
        id,
        page_count,
        body_chars = body.len(),
        outline_roots = outline.len(),
        "synthesized body"
    );

    Document {
        id: id.to_string(),
        locator: locator.normalized.clone(),
        page_count,
        body,
        metadata,
        outline,
        loaded_at: Utc::now(),
        checksum: checksum(bytes),
        issues,
    }
}

fn convert_pages(pages: Vec<PageExtraction>, issues: &mut Vec<ExtractionIssue>) -> Vec<String> {
    pages
        .into_iter()
        .enumerate()
        .map(|(i, page)| match page {
            Ok(text) => text,
            Err(reason) => {
                issues.push(ExtractionIssue::Page {
                    page: i + 1,
                    reason,
                });
                String::new()
            },
        })
        .collect()
}

fn convert_destination(
    title: &str,
    destination: RawDestination,
    page_count: usize,
    issues: &mut Vec<ExtractionIssue>,
) -> Option<usize> {
    let reason = match destination {
        RawDestination::Missing => return None,
        RawDestination::Page(page) => match usize::try_from(page) {
            Ok(page) if (1..=page_count).contains(&page) => return Some(page),
            _ => format!("page {page} is outside 1-{page_count}"),
        },
        RawDestination::Unresolved(reason) => reason,
    };

    warn!(title, %reason, "outline destination unresolved");
    issues.push(ExtractionIssue::OutlineNode {
        title: title.to_string(),
        reason,
    });
    None
}

struct Frame {
    pending: std::vec::IntoIter<RawOutlineItem>,
    done: Vec<OutlineNode>,
    node: Option<OutlineNode>,
}

/// Convert the raw outline tree without recursion. Root items get level 1.
fn convert_outline(
    raw: Vec<RawOutlineItem>,
    page_count: usize,
    issues: &mut Vec<ExtractionIssue>,
) -> Vec<OutlineNode> {
    let mut stack = vec![Frame {
        pending: raw.into_iter(),
        done: Vec::new(),
        node: None,
    }];

    loop {
        let level = stack.len();
        let Some(frame) = stack.last_mut() else {
            return Vec::new();
        };

        if let Some(RawOutlineItem {
            title,
            destination,
            children,
        }) = frame.pending.next()
        {
            let title = title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string());
            let page = convert_destination(&title, destination, page_count, issues);
            stack.push(Frame {
                pending: children.into_iter(),
                done: Vec::new(),
                node: Some(OutlineNode::new(title, level, page)),
            });
            continue;
        }

        let Some(finished) = stack.pop() else {
            return Vec::new();
        };
        match finished.node {
            Some(node) => {
                if let Some(parent) = stack.last_mut() {
                    parent.done.push(node.with_children(finished.done));
                }
            },
            None => return finished.done,
        }
    }
}

fn convert_metadata(raw: Map<String, Value>) -> BTreeMap<String, String> {
    raw.into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s.trim().to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                nested @ (Value::Array(_) | Value::Object(_)) => nested.to_string(),
            };
            (!text.is_empty()).then_some((key, text))
        })
        .collect()
}
