//! In-memory document store with a single-writer/multi-reader lock.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::locator::{self, NormalizedLocator};
use crate::storage::RegistryEntry;
use crate::types::{Document, DocumentSummary};

#[derive(Debug, Default)]
struct StoreInner {
    documents: HashMap<String, Arc<Document>>,
    /// Ids in load order.
    order: Vec<String>,
}

impl StoreInner {
    fn id_map(&self) -> HashMap<String, String> {
        self.documents
            .iter()
            .map(|(id, doc)| (id.clone(), doc.locator.clone()))
            .collect()
    }
}

/// Outcome of committing a freshly built document.
#[derive(Debug, Clone)]
pub struct Committed {
    pub document: Arc<Document>,
    /// The locator was already present; the existing document was kept.
    pub already_loaded: bool,
}

/// Loaded documents keyed by id.
///
/// Documents are built outside the lock and swapped in whole, so readers
/// never observe a partially loaded document. Cloning the store shares it.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Document>> {
        let guard = self.inner.read().await;
        guard.documents.get(id).map(Arc::clone)
    }

    /// Current `id → normalized locator` mapping.
    pub async fn id_map(&self) -> HashMap<String, String> {
        self.inner.read().await.id_map()
    }

    /// The document already loaded from `normalized`, if any.
    pub async fn find_by_locator(&self, normalized: &str) -> Option<Arc<Document>> {
        let guard = self.inner.read().await;
        guard
            .documents
            .values()
            .find(|doc| doc.locator == normalized)
            .map(Arc::clone)
    }

    /// The id `locator` would be registered under right now.
    pub async fn provisional_id(&self, locator: &NormalizedLocator) -> String {
        locator::assign_id(locator, &self.id_map().await)
    }

    /// Insert `document` unless its locator is already present.
    ///
    /// The id is settled under the write lock, so two concurrent loads of
    /// locators sharing a file name still receive distinct ids. `preferred_id`
    /// is honored when it is free.
    pub async fn commit(
        &self,
        mut document: Document,
        locator: &NormalizedLocator,
        preferred_id: Option<&str>,
    ) -> Committed {
        let mut guard = self.inner.write().await;

        if let Some(existing) = guard
            .documents
            .values()
            .find(|doc| doc.locator == locator.normalized)
        {
            tracing::debug!(id = %existing.id, "document loaded by another task");
            return Committed {
                document: Arc::clone(existing),
                already_loaded: true,
            };
        }

        let id = match preferred_id {
            Some(preferred) if !guard.documents.contains_key(preferred) => preferred.to_string(),
            _ => locator::assign_id(locator, &guard.id_map()),
        };

        document.id.clone_from(&id);
        let document = Arc::new(document);
        guard.documents.insert(id.clone(), Arc::clone(&document));
        guard.order.push(id);

        Committed {
            document,
            already_loaded: false,
        }
    }

    pub async fn remove(&self, id: &str) -> Option<Arc<Document>> {
        let mut guard = self.inner.write().await;
        let removed = guard.documents.remove(id)?;
        guard.order.retain(|existing| existing != id);
        Some(removed)
    }

    /// Summaries in load order.
    pub async fn list(&self) -> Vec<DocumentSummary> {
        let guard = self.inner.read().await;
        guard
            .order
            .iter()
            .filter_map(|id| guard.documents.get(id))
            .map(|doc| doc.summary())
            .collect()
    }

    /// Registry entries in load order.
    pub async fn registry_entries(&self) -> Vec<RegistryEntry> {
        let guard = self.inner.read().await;
        guard
            .order
            .iter()
            .filter_map(|id| guard.documents.get(id))
            .map(|doc| RegistryEntry {
                id: doc.id.clone(),
                locator: doc.locator.clone(),
            })
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.documents.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn document(locator: &NormalizedLocator) -> Document {
        Document {
            id: String::new(),
            locator: locator.normalized.clone(),
            page_count: 1,
            body: "body".to_string(),
            metadata: BTreeMap::new(),
            outline: Vec::new(),
            loaded_at: Utc::now(),
            checksum: String::new(),
            issues: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_commit_and_get() {
        let store = DocumentStore::new();
        let locator = locator::normalize("https://example.com/docs/guide.pdf");
        let committed = store.commit(document(&locator), &locator, None).await;

        assert!(!committed.already_loaded);
        assert_eq!(committed.document.id, "guide.pdf");
        let fetched = store.get("guide.pdf").await.unwrap();
        assert!(Arc::ptr_eq(&fetched, &committed.document));
    }

    #[tokio::test]
    async fn test_same_locator_commits_once() {
        let store = DocumentStore::new();
        let locator = locator::normalize("https://example.com/guide.pdf");
        let first = store.commit(document(&locator), &locator, None).await;
        let second = store.commit(document(&locator), &locator, None).await;

        assert!(second.already_loaded);
        assert!(Arc::ptr_eq(&first.document, &second.document));
        assert_eq!(store.len().await, 1);

        assert_eq!(store.provisional_id(&locator).await, "guide.pdf");
        assert!(store.find_by_locator(&locator.normalized).await.is_some());
    }

    #[tokio::test]
    async fn test_shared_file_name_gets_disambiguated() {
        let store = DocumentStore::new();
        let a = locator::normalize("https://a.example.com/report.pdf");
        let b = locator::normalize("https://b.example.com/report.pdf");
        store.commit(document(&a), &a, None).await;
        let committed = store.commit(document(&b), &b, None).await;
        assert_eq!(committed.document.id, "b.example.com/report.pdf");
    }

    #[tokio::test]
    async fn test_preferred_id_is_kept_when_free() {
        let store = DocumentStore::new();
        let a = locator::normalize("https://a.example.com/report.pdf");
        let committed = store
            .commit(document(&a), &a, Some("a.example.com/report.pdf"))
            .await;
        assert_eq!(committed.document.id, "a.example.com/report.pdf");

        let b = locator::normalize("https://b.example.com/report.pdf");
        let taken = store
            .commit(document(&b), &b, Some("a.example.com/report.pdf"))
            .await;
        assert_eq!(taken.document.id, "report.pdf");
    }

    #[tokio::test]
    async fn test_list_and_registry_follow_load_order() {
        let store = DocumentStore::new();
        for name in ["zeta.pdf", "alpha.pdf", "mid.pdf"] {
            let locator = locator::normalize(&format!("https://example.com/{name}"));
            store.commit(document(&locator), &locator, None).await;
        }
        let ids: Vec<String> = store.list().await.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["zeta.pdf", "alpha.pdf", "mid.pdf"]);

        store.remove("alpha.pdf").await.unwrap();
        let entries: Vec<String> = store
            .registry_entries()
            .await
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(entries, vec!["zeta.pdf", "mid.pdf"]);
    }

    #[tokio::test]
    async fn test_remove_unknown_is_none() {
        let store = DocumentStore::new();
        assert!(store.remove("missing").await.is_none());
        assert!(store.is_empty().await);
    }
}
