use crate::collection::{Document, DocumentId};
use crate::common::{split_path, FieldPath, Value};
use crate::index::IndexDescriptor;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Tuple of field values an index entry is keyed on, one per indexed field.
pub type IndexKey = SmallVec<[Value; 2]>;

/// In-memory equality index over an ordered field tuple.
///
/// Maps the tuple of a document's values for the indexed fields to the set
/// of identifiers holding that tuple. A missing field contributes
/// `Value::Null` to the key, which keeps lookups consistent with the
/// predicate evaluator, where equality with null matches a missing field.
pub(crate) struct FieldIndex {
    descriptor: IndexDescriptor,
    paths: Vec<FieldPath>,
    entries: HashMap<IndexKey, HashSet<DocumentId>>,
}

impl FieldIndex {
    pub fn new(descriptor: IndexDescriptor, separator: &str) -> Self {
        let paths = descriptor
            .index_fields()
            .field_names()
            .iter()
            .map(|name| split_path(name, separator))
            .collect();

        FieldIndex {
            descriptor,
            paths,
            entries: HashMap::new(),
        }
    }

    pub fn descriptor(&self) -> &IndexDescriptor {
        &self.descriptor
    }

    pub fn key_of(&self, document: &Document) -> IndexKey {
        self.paths
            .iter()
            .map(|path| document.get_path(path).cloned().unwrap_or_default())
            .collect()
    }

    pub fn add(&mut self, id: DocumentId, document: &Document) {
        let key = self.key_of(document);
        self.entries.entry(key).or_default().insert(id);
    }

    pub fn remove(&mut self, id: DocumentId, document: &Document) {
        let key = self.key_of(document);
        if let Some(ids) = self.entries.get_mut(&key) {
            ids.remove(&id);
            if ids.is_empty() {
                self.entries.remove(&key);
            }
        }
    }

    /// Moves `id` from the entry of `old` to the entry of `new`. Nothing
    /// changes when the indexed fields are untouched.
    pub fn update(&mut self, id: DocumentId, old: &Document, new: &Document) {
        if self.key_of(old) != self.key_of(new) {
            self.remove(id, old);
            self.add(id, new);
        }
    }

    pub fn lookup(&self, key: &[Value]) -> Option<&HashSet<DocumentId>> {
        self.entries.get(key)
    }

    /// Number of distinct keys in the index.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Fields;
    use crate::doc;

    fn id(n: u64) -> DocumentId {
        DocumentId::create_id(1_000_000_000_000_000_000 + n).unwrap()
    }

    fn index(fields: Vec<&str>) -> FieldIndex {
        FieldIndex::new(
            IndexDescriptor::new(Fields::with_names(fields).unwrap(), "books"),
            ".",
        )
    }

    #[test]
    fn test_add_and_lookup() {
        let mut index = index(vec!["author"]);
        index.add(id(1), &doc! { author: "Orwell" });
        index.add(id(2), &doc! { author: "Orwell" });
        index.add(id(3), &doc! { author: "Huxley" });

        let ids = index.lookup(&[Value::from("Orwell")]).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&id(1)));
        assert_eq!(index.key_count(), 2);
        assert!(index.lookup(&[Value::from("Austen")]).is_none());
    }

    #[test]
    fn test_missing_field_keys_as_null() {
        let mut index = index(vec!["author"]);
        index.add(id(1), &doc! { title: "Anonymous" });
        assert!(index.lookup(&[Value::Null]).unwrap().contains(&id(1)));
    }

    #[test]
    fn test_numeric_keys_match_across_types() {
        let mut index = index(vec!["price"]);
        index.add(id(1), &doc! { price: 10 });
        assert!(index.lookup(&[Value::from(10.0)]).is_some());
    }

    #[test]
    fn test_compound_key_and_nested_path() {
        let mut index = index(vec!["author", "meta.year"]);
        index.add(id(1), &doc! { author: "Orwell", meta: { year: 1949 } });
        index.add(id(2), &doc! { author: "Orwell", meta: { year: 1945 } });

        let ids = index.lookup(&[Value::from("Orwell"), Value::from(1949)]).unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains(&id(1)));
    }

    #[test]
    fn test_remove_drops_empty_entries() {
        let mut index = index(vec!["author"]);
        let doc = doc! { author: "Orwell" };
        index.add(id(1), &doc);
        index.remove(id(1), &doc);
        assert!(index.lookup(&[Value::from("Orwell")]).is_none());
        assert_eq!(index.key_count(), 0);
    }

    #[test]
    fn test_update_moves_entry() {
        let mut index = index(vec!["price"]);
        let old = doc! { price: 12.0, title: "1984" };
        let new = doc! { price: 14.99, title: "1984" };
        index.add(id(1), &old);
        index.update(id(1), &old, &new);

        assert!(index.lookup(&[Value::from(12.0)]).is_none());
        assert!(index.lookup(&[Value::from(14.99)]).unwrap().contains(&id(1)));
    }
}
