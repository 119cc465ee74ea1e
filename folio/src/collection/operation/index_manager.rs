use crate::collection::{Document, DocumentId};
use crate::common::{Fields, Value};
use crate::errors::{ErrorKind, FolioError, FolioResult};
use crate::index::field_index::FieldIndex;
use crate::index::IndexDescriptor;
use crate::store::DocumentStore;
use std::collections::{BTreeMap, HashSet};

/// Owns the indexes of one collection and keeps them in step with the
/// document store.
///
/// Every method is called with the collection's write lock held (or the
/// read lock for lookups), so index maintenance is part of the same
/// critical section as the mutation that triggers it.
pub(crate) struct IndexManager {
    collection_name: String,
    field_separator: String,
    indexes: BTreeMap<Fields, FieldIndex>,
}

impl IndexManager {
    pub fn new(collection_name: &str, field_separator: &str) -> Self {
        IndexManager {
            collection_name: collection_name.to_string(),
            field_separator: field_separator.to_string(),
            indexes: BTreeMap::new(),
        }
    }

    pub fn has_index(&self, fields: &Fields) -> bool {
        self.indexes.contains_key(fields)
    }

    pub fn index_descriptors(&self) -> Vec<IndexDescriptor> {
        self.indexes
            .values()
            .map(|index| index.descriptor().clone())
            .collect()
    }

    pub fn indexes(&self) -> impl Iterator<Item = &FieldIndex> {
        self.indexes.values()
    }

    /// Identifiers stored under `key` in the index on `fields`.
    pub fn lookup(&self, fields: &Fields, key: &[Value]) -> Option<&HashSet<DocumentId>> {
        self.indexes.get(fields).and_then(|index| index.lookup(key))
    }

    /// Creates an index on `fields` and builds it from the current contents
    /// of `store`.
    pub fn create_index(&mut self, fields: Fields, store: &DocumentStore) -> FolioResult<IndexDescriptor> {
        if self.indexes.contains_key(&fields) {
            log::error!("Index on {} already exists in {}", fields, self.collection_name);
            return Err(FolioError::new(
                &format!("Index on {} already exists", fields),
                ErrorKind::IndexAlreadyExists,
            ));
        }

        let descriptor = IndexDescriptor::new(fields.clone(), &self.collection_name);
        let mut index = FieldIndex::new(descriptor.clone(), &self.field_separator);
        for (id, document) in store.iter() {
            index.add(*id, document);
        }

        log::info!(
            "Created index {} over {} documents with {} keys",
            descriptor,
            store.len(),
            index.key_count()
        );
        self.indexes.insert(fields, index);
        Ok(descriptor)
    }

    pub fn drop_index(&mut self, fields: &Fields) -> FolioResult<()> {
        match self.indexes.remove(fields) {
            Some(index) => {
                log::info!("Dropped index {}", index.descriptor());
                Ok(())
            }
            None => {
                log::error!("No index on {} found in {}", fields, self.collection_name);
                Err(FolioError::new(
                    &format!("No index on {} found", fields),
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    pub fn drop_all(&mut self) {
        if !self.indexes.is_empty() {
            log::info!("Dropping {} indexes of {}", self.indexes.len(), self.collection_name);
        }
        self.indexes.clear();
    }

    pub fn on_insert(&mut self, id: DocumentId, document: &Document) {
        for index in self.indexes.values_mut() {
            index.add(id, document);
        }
    }

    pub fn on_update(&mut self, id: DocumentId, old: &Document, new: &Document) {
        for index in self.indexes.values_mut() {
            index.update(id, old, new);
        }
    }

    pub fn on_remove(&mut self, id: DocumentId, document: &Document) {
        for index in self.indexes.values_mut() {
            index.remove(id, document);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    fn id(n: u64) -> DocumentId {
        DocumentId::create_id(1_000_000_000_000_000_000 + n).unwrap()
    }

    fn fields(names: Vec<&str>) -> Fields {
        Fields::with_names(names).unwrap()
    }

    fn store() -> DocumentStore {
        let mut store = DocumentStore::new();
        store.insert(id(1), doc! { author: "Orwell", title: "1984" }).unwrap();
        store.insert(id(2), doc! { author: "Huxley", title: "Brave New World" }).unwrap();
        store
    }

    fn lookup(manager: &IndexManager, index_fields: &Fields, key: &[Value]) -> usize {
        manager.lookup(index_fields, key).map(|ids| ids.len()).unwrap_or(0)
    }

    #[test]
    fn test_create_index_builds_from_store() {
        let mut manager = IndexManager::new("books", ".");
        let descriptor = manager.create_index(fields(vec!["author"]), &store()).unwrap();
        assert_eq!(descriptor.collection_name(), "books");
        assert!(manager.has_index(&fields(vec!["author"])));
        assert_eq!(lookup(&manager, &fields(vec!["author"]), &[Value::from("Orwell")]), 1);
    }

    #[test]
    fn test_create_index_twice_fails() {
        let mut manager = IndexManager::new("books", ".");
        manager.create_index(fields(vec!["author"]), &store()).unwrap();
        let err = manager.create_index(fields(vec!["author"]), &store()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::IndexAlreadyExists);
    }

    #[test]
    fn test_drop_index() {
        let mut manager = IndexManager::new("books", ".");
        manager.create_index(fields(vec!["author"]), &store()).unwrap();
        manager.drop_index(&fields(vec!["author"])).unwrap();
        assert!(!manager.has_index(&fields(vec!["author"])));

        let err = manager.drop_index(&fields(vec!["author"])).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NotFound);
    }

    #[test]
    fn test_drop_all() {
        let mut manager = IndexManager::new("books", ".");
        manager.create_index(fields(vec!["author"]), &store()).unwrap();
        manager.create_index(fields(vec!["author", "title"]), &store()).unwrap();
        assert_eq!(manager.index_descriptors().len(), 2);
        manager.drop_all();
        assert!(manager.index_descriptors().is_empty());
    }

    #[test]
    fn test_maintenance() {
        let mut manager = IndexManager::new("books", ".");
        let author = fields(vec!["author"]);
        manager.create_index(author.clone(), &store()).unwrap();

        let new_doc = doc! { author: "Orwell", title: "Animal Farm" };
        manager.on_insert(id(3), &new_doc);
        assert_eq!(lookup(&manager, &author, &[Value::from("Orwell")]), 2);

        let renamed = doc! { author: "Eric Blair", title: "Animal Farm" };
        manager.on_update(id(3), &new_doc, &renamed);
        assert_eq!(lookup(&manager, &author, &[Value::from("Orwell")]), 1);
        assert_eq!(lookup(&manager, &author, &[Value::from("Eric Blair")]), 1);

        manager.on_remove(id(3), &renamed);
        assert_eq!(lookup(&manager, &author, &[Value::from("Eric Blair")]), 0);
    }
}
