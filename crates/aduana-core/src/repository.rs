//! Storage for extracted documents.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::models::document::{DocumentKind, ExtractedDocument};

/// Where processed documents are kept. Implementations must be shareable
/// across threads.
pub trait DocumentRepository: Send + Sync {
    /// Store a document and return its id.
    fn add(&self, document: ExtractedDocument) -> u64;

    fn get(&self, id: u64) -> Option<ExtractedDocument>;

    /// Stored documents of one kind (all kinds with `None`), by id.
    fn list(&self, kind: Option<DocumentKind>) -> Vec<(u64, ExtractedDocument)>;

    /// Remove a document; `false` if the id was unknown.
    fn delete(&self, id: u64) -> bool;
}

/// Process-local repository.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    documents: RwLock<BTreeMap<u64, ExtractedDocument>>,
    next_id: AtomicU64,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentRepository for InMemoryRepository {
    fn add(&self, document: ExtractedDocument) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, document);
        id
    }

    fn get(&self, id: u64) -> Option<ExtractedDocument> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn list(&self, kind: Option<DocumentKind>) -> Vec<(u64, ExtractedDocument)> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, doc)| kind.is_none_or(|k| doc.kind() == k))
            .map(|(id, doc)| (*id, doc.clone()))
            .collect()
    }

    fn delete(&self, id: u64) -> bool {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{CustomsRecord, DocumentMetadata};
    use std::sync::Arc;
    use std::thread;

    fn doc(kind: DocumentKind) -> ExtractedDocument {
        ExtractedDocument {
            record: CustomsRecord::empty(kind),
            metadata: DocumentMetadata::default(),
        }
    }

    #[test]
    fn test_add_get_delete() {
        let repo = InMemoryRepository::new();
        let id = repo.add(doc(DocumentKind::GuiaDespacho));

        assert_eq!(repo.get(id).map(|d| d.kind()), Some(DocumentKind::GuiaDespacho));
        assert!(repo.delete(id));
        assert!(!repo.delete(id));
        assert!(repo.get(id).is_none());
        assert!(repo.is_empty());
    }

    #[test]
    fn test_list_by_kind() {
        let repo = InMemoryRepository::new();
        let a = repo.add(doc(DocumentKind::TactAdc));
        repo.add(doc(DocumentKind::CarnetAduanero));
        let c = repo.add(doc(DocumentKind::TactAdc));

        let ids: Vec<u64> = repo
            .list(Some(DocumentKind::TactAdc))
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(repo.list(None).len(), 3);
    }

    #[test]
    fn test_concurrent_adds_get_distinct_ids() {
        let repo: Arc<dyn DocumentRepository> = Arc::new(InMemoryRepository::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || repo.add(doc(DocumentKind::SeleccionAforo)))
            })
            .collect();

        let mut ids: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(repo.list(None).len(), 8);
    }
}
