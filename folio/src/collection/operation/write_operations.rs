use crate::collection::operation::{IndexManager, ReadOperations, WriteResult};
use crate::collection::{Document, DocumentId};
use crate::common::{split_path, Value, DOC_ID};
use crate::errors::{ErrorKind, FolioError, FolioResult};
use crate::filter::Filter;
use crate::folio_config::FolioConfig;
use crate::store::DocumentStore;
use std::collections::HashSet;

/// Mutation path of a collection. Borrows the collection state under its
/// write lock; every operation validates and computes its full effect
/// before touching the store, so a failure leaves the collection
/// unchanged.
pub(crate) struct WriteOperations<'a> {
    store: &'a mut DocumentStore,
    index_manager: &'a mut IndexManager,
    config: &'a FolioConfig,
}

impl<'a> WriteOperations<'a> {
    pub fn new(store: &'a mut DocumentStore, index_manager: &'a mut IndexManager, config: &'a FolioConfig) -> Self {
        WriteOperations {
            store,
            index_manager,
            config,
        }
    }

    /// Inserts a document, assigning a fresh id unless `_id` is supplied.
    pub fn insert(&mut self, document: Document) -> FolioResult<DocumentId> {
        let (id, document) = self.prepare_insert(document)?;
        self.store.insert(id, document.clone())?;
        self.index_manager.on_insert(id, &document);
        log::debug!("Inserted document {}", id);
        Ok(id)
    }

    /// Inserts all documents or none: any duplicate id, against the store
    /// or within the batch, fails the whole call.
    pub fn insert_many(&mut self, documents: Vec<Document>) -> FolioResult<WriteResult> {
        let mut prepared = Vec::with_capacity(documents.len());
        let mut batch_ids = HashSet::with_capacity(documents.len());
        for document in documents {
            let (id, document) = self.prepare_insert(document)?;
            if self.store.contains(&id) || !batch_ids.insert(id) {
                log::error!("Document with id {} already exists", id);
                return Err(FolioError::new(
                    &format!("Document with id {} already exists", id),
                    ErrorKind::DuplicateKey,
                ));
            }
            prepared.push((id, document));
        }

        let mut ids = Vec::with_capacity(prepared.len());
        for (id, document) in prepared {
            self.store.insert(id, document.clone())?;
            self.index_manager.on_insert(id, &document);
            ids.push(id);
        }
        log::debug!("Inserted {} documents", ids.len());
        let matched = ids.len();
        Ok(WriteResult::new(ids, matched))
    }

    /// Applies `patch` to the first matching document in collection order,
    /// or to every match unless `just_once` is set.
    pub fn update(&mut self, filter: &Filter, patch: &Document, just_once: bool) -> FolioResult<WriteResult> {
        Self::validate_patch(patch)?;
        let ids = self.matching_ids(filter, just_once);
        self.apply_updates(&ids, patch)
    }

    pub fn update_by_id(&mut self, id: &DocumentId, patch: &Document) -> FolioResult<WriteResult> {
        Self::validate_patch(patch)?;
        if !self.store.contains(id) {
            log::error!("No document found with id {}", id);
            return Err(FolioError::new(
                &format!("No document found with id {}", id),
                ErrorKind::NotFound,
            ));
        }
        self.apply_updates(&[*id], patch)
    }

    /// Removes the first matching document in collection order, or every
    /// match unless `just_once` is set.
    pub fn remove(&mut self, filter: &Filter, just_once: bool) -> FolioResult<WriteResult> {
        let ids = self.matching_ids(filter, just_once);
        for id in &ids {
            let removed = self.store.remove(id)?;
            self.index_manager.on_remove(*id, &removed);
        }
        if !ids.is_empty() {
            log::debug!("Removed {} documents", ids.len());
        }
        let matched = ids.len();
        Ok(WriteResult::new(ids, matched))
    }

    pub fn remove_by_id(&mut self, id: &DocumentId) -> FolioResult<WriteResult> {
        let removed = self.store.remove(id)?;
        self.index_manager.on_remove(*id, &removed);
        Ok(WriteResult::new(vec![*id], 1))
    }

    fn prepare_insert(&self, mut document: Document) -> FolioResult<(DocumentId, Document)> {
        let id = match document.get(DOC_ID) {
            None => {
                let id = self.config.next_id();
                document.put(DOC_ID, id)?;
                id
            }
            Some(Value::Id(id)) => *id,
            Some(other) => {
                log::error!("Document id must be a DocumentId, got {}", other.type_name());
                return Err(FolioError::new(
                    &format!("Document id must be a DocumentId, got {}", other.type_name()),
                    ErrorKind::InvalidArgument,
                ));
            }
        };
        Ok((id, document))
    }

    fn matching_ids(&self, filter: &Filter, just_once: bool) -> Vec<DocumentId> {
        let read = ReadOperations::new(&*self.store, &*self.index_manager, self.config.field_separator());
        let matches = read.select(filter).matches.into_iter().map(|(id, _)| id);
        if just_once {
            matches.take(1).collect()
        } else {
            matches.collect()
        }
    }

    fn apply_updates(&mut self, ids: &[DocumentId], patch: &Document) -> FolioResult<WriteResult> {
        let mut changes = Vec::with_capacity(ids.len());
        for id in ids {
            let current = self.store.get(id).cloned().ok_or_else(|| {
                log::error!("Document {} vanished during update", id);
                FolioError::new(
                    &format!("Document {} vanished during update", id),
                    ErrorKind::InternalError,
                )
            })?;
            let updated = self.apply_patch(&current, patch)?;
            if updated != current {
                changes.push((*id, current, updated));
            }
        }

        let mut modified = Vec::with_capacity(changes.len());
        for (id, current, updated) in changes {
            self.store.replace(id, updated.clone())?;
            self.index_manager.on_update(id, &current, &updated);
            modified.push(id);
        }
        log::debug!("Updated {} of {} matched documents", modified.len(), ids.len());
        Ok(WriteResult::new(modified, ids.len()))
    }

    fn validate_patch(patch: &Document) -> FolioResult<()> {
        if patch.is_empty() {
            log::error!("Update document cannot be empty");
            return Err(FolioError::new(
                "Update document cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }

        if let Some((key, _)) = patch.iter().find(|(key, _)| key.starts_with('$')) {
            log::error!("Update operator {} is not supported", key);
            return Err(FolioError::new(
                &format!("Update operator {} is not supported, pass the fields to set", key),
                ErrorKind::InvalidArgument,
            ));
        }
        Ok(())
    }

    /// Merges `patch` into a copy of `document`. Keys containing the field
    /// separator set embedded fields; `_id` may only be restated unchanged.
    fn apply_patch(&self, document: &Document, patch: &Document) -> FolioResult<Document> {
        let mut updated = document.clone();
        for (key, value) in patch.iter() {
            let path = split_path(key, self.config.field_separator());
            if path.first().map(String::as_str) == Some(DOC_ID) {
                if path.len() == 1 && document.get(DOC_ID) == Some(value) {
                    continue;
                }
                log::error!("Document id cannot be changed by an update");
                return Err(FolioError::new(
                    "Document id cannot be changed by an update",
                    ErrorKind::InvalidArgument,
                ));
            }
            updated.put_path(&path, value.clone())?;
        }
        Ok(updated)
    }
}
