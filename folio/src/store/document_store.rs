use crate::collection::{Document, DocumentId};
use crate::errors::{ErrorKind, FolioError, FolioResult};
use indexmap::IndexMap;

/// Identifier-keyed document storage that preserves insertion order.
///
/// Iteration yields documents in the order they were inserted, which is
/// the collection order used for stable sorting and for `update_one` /
/// `delete_one` match selection. Removal shifts later entries down so the
/// relative order of the survivors is unchanged.
#[derive(Default)]
pub(crate) struct DocumentStore {
    documents: IndexMap<DocumentId, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        DocumentStore {
            documents: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, id: DocumentId, document: Document) -> FolioResult<()> {
        if self.documents.contains_key(&id) {
            log::error!("Document with id {} already exists", id);
            return Err(FolioError::new(
                &format!("Document with id {} already exists", id),
                ErrorKind::DuplicateKey,
            ));
        }
        self.documents.insert(id, document);
        Ok(())
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.documents.contains_key(id)
    }

    /// Replaces the document stored under `id` in place, returning the
    /// previous version.
    pub fn replace(&mut self, id: DocumentId, document: Document) -> FolioResult<Document> {
        match self.documents.get_mut(&id) {
            Some(existing) => Ok(std::mem::replace(existing, document)),
            None => {
                log::error!("No document found with id {}", id);
                Err(FolioError::new(
                    &format!("No document found with id {}", id),
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    pub fn remove(&mut self, id: &DocumentId) -> FolioResult<Document> {
        self.documents.shift_remove(id).ok_or_else(|| {
            log::error!("No document found with id {}", id);
            FolioError::new(
                &format!("No document found with id {}", id),
                ErrorKind::NotFound,
            )
        })
    }

    /// Insertion rank of `id`, used to restore collection order after an
    /// index lookup.
    pub fn position(&self, id: &DocumentId) -> Option<usize> {
        self.documents.get_index_of(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &Document)> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}
