//! The document library: load, inspect and query documents.
//!
//! [`Library`] owns the in-memory [`DocumentStore`], the [`Loader`] that builds
//! documents, and (optionally) the [`Storage`] holding the persisted registry.
//! Cloning a library shares its store.
//!
//! ```rust,no_run
//! use folio_core::{Config, Library, SearchRequest};
//!
//! # async fn demo() -> folio_core::Result<()> {
//! let library = Library::new(Config::load()?)?;
//! let loaded = library.load("./manual.pdf").await?;
//! let page = library.section(&loaded.id, "Installation", None, None).await?;
//! println!("{} ({} of {})", page.section, page.page, page.total_pages);
//!
//! let hits = library.search(&loaded.id, SearchRequest::new("license")).await?;
//! println!("{} sections mention it", hits.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::decode::{DocumentDecoder, LopdfDecoder};
use crate::headings::HeadingIndex;
use crate::loader::Loader;
use crate::locator;
use crate::paginate;
use crate::search::{self, SearchOptions};
use crate::section;
use crate::storage::Storage;
use crate::store::DocumentStore;
use crate::types::{
    Document, DocumentInfo, DocumentSummary, LoadOutcome, OutlineNode, SearchGroup, SectionPage,
};
use crate::{Error, Result};

/// Text returned by [`Library::outline`] for documents without an outline.
pub const NO_OUTLINE: &str = "No outline available";

/// Search parameters with optional overrides of the configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub case_sensitive: Option<bool>,
    pub regex: Option<bool>,
    pub max_results: Option<usize>,
    pub context_chars: Option<usize>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// A registry entry that could not be restored.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreFailure {
    pub id: String,
    pub locator: String,
    pub error: String,
}

/// Outcome of replaying the persisted registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreReport {
    pub restored: Vec<LoadOutcome>,
    pub failed: Vec<RestoreFailure>,
}

impl RestoreReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Library {
    config: Config,
    store: DocumentStore,
    loader: Loader,
    storage: Option<Storage>,
    /// Serializes registry snapshots and writes so the file never regresses.
    registry_lock: Arc<Mutex<()>>,
}

impl Library {
    /// A library persisting its registry under the configured data directory.
    pub fn new(config: Config) -> Result<Self> {
        let storage = Storage::new(&config)?;
        Self::with_parts(config, Some(storage), Arc::new(LopdfDecoder::new()))
    }

    /// A library with no persisted registry, for one-shot use.
    pub fn ephemeral(config: Config) -> Result<Self> {
        Self::with_parts(config, None, Arc::new(LopdfDecoder::new()))
    }

    /// Assemble a library from explicit parts.
    pub fn with_parts(
        config: Config,
        storage: Option<Storage>,
        decoder: Arc<dyn DocumentDecoder>,
    ) -> Result<Self> {
        config.validate()?;
        let loader = Loader::new(&config.fetch, decoder)?;
        Ok(Self {
            config,
            store: DocumentStore::new(),
            loader,
            storage,
            registry_lock: Arc::new(Mutex::new(())),
        })
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub const fn storage(&self) -> Option<&Storage> {
        self.storage.as_ref()
    }

    async fn document(&self, id: &str) -> Result<Arc<Document>> {
        self.store
            .get(id)
            .await
            .ok_or_else(|| Error::NotFound(format!("Document '{id}' is not loaded")))
    }

    /// Write the registry to disk. Failures are logged; the in-memory change stands.
    async fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let _guard = self.registry_lock.lock().await;
        let entries = self.store.registry_entries().await;
        if let Err(e) = storage.save_registry(&entries) {
            warn!(error = %e, "failed to persist document registry");
        }
    }

    async fn load_as(&self, locator: &str, preferred_id: Option<&str>) -> Result<LoadOutcome> {
        if locator.trim().is_empty() {
            return Err(Error::InvalidArgument("Locator must not be empty".into()));
        }

        let normalized = locator::normalize(locator);
        if let Some(existing) = self.store.find_by_locator(&normalized.normalized).await {
            tracing::debug!(id = %existing.id, "document already loaded");
            return Ok(LoadOutcome {
                id: existing.id.clone(),
                page_count: existing.page_count,
                already_loaded: true,
            });
        }

        let id = match preferred_id {
            Some(id) => id.to_string(),
            None => self.store.provisional_id(&normalized).await,
        };
        let document = self.loader.load(&id, &normalized).await?;
        let committed = self.store.commit(document, &normalized, preferred_id).await;

        Ok(LoadOutcome {
            id: committed.document.id.clone(),
            page_count: committed.document.page_count,
            already_loaded: committed.already_loaded,
        })
    }

    /// Load the document at `locator` (path or URL).
    ///
    /// Loading a locator that is already loaded returns its existing id.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self, locator: &str) -> Result<LoadOutcome> {
        let outcome = self.load_as(locator, None).await?;
        if !outcome.already_loaded {
            info!(id = %outcome.id, pages = outcome.page_count, "registered document");
            self.persist().await;
        }
        Ok(outcome)
    }

    /// Page `page` (default 1) of the section whose title matches `title`.
    #[tracing::instrument(skip(self))]
    pub async fn section(
        &self,
        id: &str,
        title: &str,
        page: Option<usize>,
        char_budget: Option<usize>,
    ) -> Result<SectionPage> {
        let budget = char_budget.unwrap_or(self.config.pagination.char_budget);
        if budget == 0 {
            return Err(Error::InvalidArgument(
                "Character budget must be greater than zero".into(),
            ));
        }
        let page = page.unwrap_or(1);

        let document = self.document(id).await?;
        let index = HeadingIndex::build(&document.body);
        let located = section::locate(&document.body, &index, title)?;

        let pages = paginate::paginate(&located.content, budget);
        let content = paginate::select_page(&pages, page)?.to_string();

        Ok(SectionPage {
            page,
            total_pages: pages.len(),
            content,
            section: located.title,
        })
    }

    /// Search a document, grouping matches by section.
    #[tracing::instrument(skip(self, request), fields(query = %request.query))]
    pub async fn search(&self, id: &str, request: SearchRequest) -> Result<Vec<SearchGroup>> {
        let options = SearchOptions {
            query: request.query,
            regex: request.regex.unwrap_or(false),
            case_sensitive: request.case_sensitive.unwrap_or(false),
            max_results: request.max_results.or(self.config.search.max_results),
            context_chars: request
                .context_chars
                .unwrap_or(self.config.search.context_chars),
        };

        let document = self.document(id).await?;
        let index = HeadingIndex::build(&document.body);
        search::search(&document.body, &index, &options)
    }

    /// The outline rendered as an indented list.
    #[tracing::instrument(skip(self))]
    pub async fn outline(&self, id: &str) -> Result<String> {
        let document = self.document(id).await?;
        Ok(format_outline(&document.outline))
    }

    #[tracing::instrument(skip(self))]
    pub async fn info(&self, id: &str) -> Result<DocumentInfo> {
        let document = self.document(id).await?;
        Ok(DocumentInfo::from(document.as_ref()))
    }

    /// Loaded documents in load order.
    pub async fn list(&self) -> Vec<DocumentSummary> {
        self.store.list().await
    }

    /// Remove a document. Returns false when `id` is not loaded.
    #[tracing::instrument(skip(self))]
    pub async fn unload(&self, id: &str) -> bool {
        if self.store.remove(id).await.is_none() {
            return false;
        }
        info!(id, "unloaded document");
        self.persist().await;
        true
    }

    /// Replay the persisted registry in saved order.
    ///
    /// Each entry is loaded under its saved id. An entry that fails is logged
    /// and reported; it never stops the remaining entries. The registry file
    /// itself is left untouched so failed entries can be retried later.
    #[tracing::instrument(skip(self))]
    pub async fn restore(&self) -> Result<RestoreReport> {
        let Some(storage) = &self.storage else {
            return Ok(RestoreReport::default());
        };

        let mut report = RestoreReport::default();
        for entry in storage.load_registry()? {
            match self.load_as(&entry.locator, Some(&entry.id)).await {
                Ok(outcome) => report.restored.push(outcome),
                Err(e) => {
                    warn!(id = %entry.id, locator = %entry.locator, error = %e, "failed to restore document");
                    report.failed.push(RestoreFailure {
                        id: entry.id,
                        locator: entry.locator,
                        error: e.to_string(),
                    });
                },
            }
        }

        info!(
            restored = report.restored.len(),
            failed = report.failed.len(),
            "registry replayed"
        );
        Ok(report)
    }
}

/// Render an outline as a bulleted list, two spaces of indent per depth.
pub fn format_outline(outline: &[OutlineNode]) -> String {
    if outline.is_empty() {
        return NO_OUTLINE.to_string();
    }

    let mut lines = Vec::new();
    let mut stack: Vec<(&OutlineNode, usize)> = outline.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        lines.push(match node.page {
            Some(page) => format!("{indent}- {} (p. {page})", node.title),
            None => format!("{indent}- {}", node.title),
        });
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
    lines.join("\n")
}
