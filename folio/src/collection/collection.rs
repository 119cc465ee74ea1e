use crate::aggregate::{AggregateResult, AggregationPipeline, Stage};
use crate::collection::operation::{IndexManager, ReadOperations, WriteOperations, WriteResult};
use crate::collection::{Document, DocumentId, FindOptions, FindPlan};
use crate::common::{DocumentCursor, Fields};
use crate::errors::{ErrorKind, FolioError, FolioResult};
use crate::filter::Filter;
use crate::folio_config::FolioConfig;
use crate::index::IndexDescriptor;
use crate::store::DocumentStore;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A named set of documents with its secondary indexes.
///
/// `Collection` is a cheap handle: clones share the same documents. The
/// collection is the unit of mutual exclusion. Reads (`find`, `explain`,
/// `aggregate`, `get_by_id`) run concurrently under a shared lock, while
/// every mutation and index operation takes the lock exclusively, index
/// maintenance included. Mutations are all-or-nothing.
///
/// # Examples
///
/// ```rust
/// use folio::collection::order_by;
/// use folio::common::SortOrder;
/// use folio::filter::field;
/// use folio::{doc, Folio};
///
/// let db = Folio::builder().open().unwrap();
/// let books = db.collection("books").unwrap();
/// books.insert(doc! { title: "1984", genre: "Fiction", price: 12.0 }).unwrap();
/// books.insert(doc! { title: "Brave New World", genre: "Fiction", price: 10.0 }).unwrap();
///
/// let cursor = books
///     .find_with_options(field("genre").eq("Fiction"), &order_by("price", SortOrder::Descending))
///     .unwrap();
/// let titles: Vec<_> = cursor.map(|d| d.get("title").cloned()).collect();
/// assert_eq!(titles.len(), 2);
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

struct CollectionInner {
    name: String,
    config: FolioConfig,
    dropped: AtomicBool,
    state: RwLock<CollectionState>,
}

struct CollectionState {
    store: DocumentStore,
    index_manager: IndexManager,
}

impl Collection {
    pub(crate) fn new(name: &str, config: FolioConfig) -> Self {
        let index_manager = IndexManager::new(name, config.field_separator());
        Collection {
            inner: Arc::new(CollectionInner {
                name: name.to_string(),
                config,
                dropped: AtomicBool::new(false),
                state: RwLock::new(CollectionState {
                    store: DocumentStore::new(),
                    index_manager,
                }),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Number of documents in the collection.
    pub fn size(&self) -> FolioResult<usize> {
        let state = self.inner.state.read();
        self.ensure_open()?;
        Ok(state.store.len())
    }

    /// Inserts a document and returns its identifier. An `_id` is generated
    /// when the document has none.
    pub fn insert(&self, document: Document) -> FolioResult<DocumentId> {
        self.write(|ops| ops.insert(document))
    }

    /// Inserts every document or none of them.
    pub fn insert_many(&self, documents: Vec<Document>) -> FolioResult<WriteResult> {
        self.write(|ops| ops.insert_many(documents))
    }

    pub fn get_by_id(&self, id: &DocumentId) -> FolioResult<Document> {
        self.read(|ops| ops.get_by_id(id))
    }

    pub fn find(&self, filter: Filter) -> FolioResult<DocumentCursor> {
        self.find_with_options(filter, &FindOptions::default())
    }

    pub fn find_with_options(&self, filter: Filter, find_options: &FindOptions) -> FolioResult<DocumentCursor> {
        self.read(|ops| ops.find(&filter, find_options))
    }

    /// Reports how a query would run: the scan strategy, the conditions left
    /// for the evaluator, and the examined and returned counts.
    pub fn explain(&self, filter: Filter) -> FolioResult<FindPlan> {
        self.explain_with_options(filter, &FindOptions::default())
    }

    pub fn explain_with_options(&self, filter: Filter, find_options: &FindOptions) -> FolioResult<FindPlan> {
        let cursor = self.find_with_options(filter, find_options)?;
        Ok(cursor.find_plan().clone())
    }

    /// Applies `patch` to the first matching document, in collection order.
    pub fn update_one(&self, filter: Filter, patch: &Document) -> FolioResult<WriteResult> {
        self.write(|ops| ops.update(&filter, patch, true))
    }

    pub fn update_many(&self, filter: Filter, patch: &Document) -> FolioResult<WriteResult> {
        self.write(|ops| ops.update(&filter, patch, false))
    }

    pub fn update_by_id(&self, id: &DocumentId, patch: &Document) -> FolioResult<WriteResult> {
        self.write(|ops| ops.update_by_id(id, patch))
    }

    pub fn delete_one(&self, filter: Filter) -> FolioResult<WriteResult> {
        self.write(|ops| ops.remove(&filter, true))
    }

    pub fn delete_many(&self, filter: Filter) -> FolioResult<WriteResult> {
        self.write(|ops| ops.remove(&filter, false))
    }

    pub fn delete_by_id(&self, id: &DocumentId) -> FolioResult<WriteResult> {
        self.write(|ops| ops.remove_by_id(id))
    }

    /// Creates an equality index on the ordered field tuple and builds it
    /// from the current documents.
    pub fn create_index(&self, field_names: Vec<&str>) -> FolioResult<IndexDescriptor> {
        let fields = Fields::with_names(field_names)?;
        let mut guard = self.inner.state.write();
        self.ensure_open()?;
        let state = &mut *guard;
        state.index_manager.create_index(fields, &state.store)
    }

    pub fn drop_index(&self, field_names: Vec<&str>) -> FolioResult<()> {
        let fields = Fields::with_names(field_names)?;
        let mut state = self.inner.state.write();
        self.ensure_open()?;
        state.index_manager.drop_index(&fields)
    }

    pub fn drop_all_indexes(&self) -> FolioResult<()> {
        let mut state = self.inner.state.write();
        self.ensure_open()?;
        state.index_manager.drop_all();
        Ok(())
    }

    pub fn has_index(&self, field_names: Vec<&str>) -> FolioResult<bool> {
        let fields = Fields::with_names(field_names)?;
        let state = self.inner.state.read();
        self.ensure_open()?;
        Ok(state.index_manager.has_index(&fields))
    }

    pub fn list_indexes(&self) -> FolioResult<Vec<IndexDescriptor>> {
        let state = self.inner.state.read();
        self.ensure_open()?;
        Ok(state.index_manager.index_descriptors())
    }

    /// Runs an aggregation pipeline over the collection.
    pub fn aggregate(&self, stages: Vec<Stage>) -> FolioResult<AggregateResult> {
        let separator = self.inner.config.field_separator();
        self.read(|ops| AggregationPipeline::new(ops, separator).execute(&stages))
    }

    pub fn is_dropped(&self) -> bool {
        self.inner.dropped.load(Ordering::Acquire)
    }

    /// Empties the collection and invalidates every handle to it.
    pub(crate) fn drop_contents(&self) {
        let mut state = self.inner.state.write();
        self.inner.dropped.store(true, Ordering::Release);
        state.index_manager.drop_all();
        state.store = DocumentStore::new();
        log::info!("Dropped collection {}", self.inner.name);
    }

    fn ensure_open(&self) -> FolioResult<()> {
        if self.is_dropped() {
            log::error!("Collection {} has been dropped", self.inner.name);
            return Err(FolioError::new(
                &format!("Collection {} has been dropped", self.inner.name),
                ErrorKind::NotFound,
            ));
        }
        Ok(())
    }

    fn read<T>(&self, operation: impl FnOnce(ReadOperations<'_>) -> FolioResult<T>) -> FolioResult<T> {
        let state = self.inner.state.read();
        self.ensure_open()?;
        let ops = ReadOperations::new(&state.store, &state.index_manager, self.inner.config.field_separator());
        operation(ops)
    }

    fn write<T>(&self, operation: impl FnOnce(&mut WriteOperations<'_>) -> FolioResult<T>) -> FolioResult<T> {
        let mut guard = self.inner.state.write();
        self.ensure_open()?;
        let state = &mut *guard;
        let mut ops = WriteOperations::new(&mut state.store, &mut state.index_manager, &self.inner.config);
        operation(&mut ops)
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.inner.name)
            .field("dropped", &self.is_dropped())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Expression, Group};
    use crate::collection::{order_by, ScanStrategy};
    use crate::common::{SortOrder, Value};
    use crate::doc;
    use crate::filter::{all, field};

    fn books() -> Collection {
        let collection = Collection::new("books", FolioConfig::default());
        collection
            .insert_many(vec![
                doc! { title: "1984", author: "George Orwell", genre: "Fiction", published_year: 1949, price: 12.0 },
                doc! { title: "Brave New World", author: "Aldous Huxley", genre: "Fiction", published_year: 1932, price: 10.0 },
            ])
            .unwrap();
        collection
    }

    #[test]
    fn test_insert_and_get_by_id() {
        let collection = books();
        let id = collection.insert(doc! { title: "Sapiens", genre: "History" }).unwrap();
        let stored = collection.get_by_id(&id).unwrap();
        assert_eq!(stored.id(), Some(id));
        assert_eq!(collection.size().unwrap(), 3);
    }

    #[test]
    fn test_find_sorted() {
        let collection = books();
        let cursor = collection
            .find_with_options(field("genre").eq("Fiction"), &order_by("price", SortOrder::Descending))
            .unwrap();
        let titles: Vec<Value> = cursor.filter_map(|d| d.get("title").cloned()).collect();
        assert_eq!(titles, vec![Value::from("1984"), Value::from("Brave New World")]);
    }

    #[test]
    fn test_explain_reflects_index() {
        let collection = books();
        let plan = collection.explain(field("title").eq("1984")).unwrap();
        assert_eq!(plan.strategy(), &ScanStrategy::FullScan);
        assert_eq!(plan.docs_examined(), 2);

        collection.create_index(vec!["title"]).unwrap();
        let plan = collection.explain(field("title").eq("1984")).unwrap();
        assert!(plan.is_index_scan());
        assert_eq!(plan.docs_examined(), 1);
        assert_eq!(plan.n_returned(), 1);
    }

    #[test]
    fn test_index_lifecycle() {
        let collection = books();
        collection.create_index(vec!["author", "published_year"]).unwrap();
        assert!(collection.has_index(vec!["author", "published_year"]).unwrap());
        assert!(!collection.has_index(vec!["published_year", "author"]).unwrap());
        assert_eq!(collection.list_indexes().unwrap().len(), 1);

        let err = collection.create_index(vec!["author", "published_year"]).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::IndexAlreadyExists);

        collection.drop_index(vec!["author", "published_year"]).unwrap();
        let err = collection.drop_index(vec!["author", "published_year"]).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NotFound);
    }

    #[test]
    fn test_update_and_delete() {
        let collection = books();
        let result = collection
            .update_one(field("title").eq("1984"), &doc! { price: 14.99 })
            .unwrap();
        assert_eq!(result.modified_count(), 1);

        let cursor = collection.find(field("price").eq(14.99)).unwrap();
        assert_eq!(cursor.size(), 1);

        let result = collection.delete_many(field("genre").eq("Fiction")).unwrap();
        assert_eq!(result.modified_count(), 2);
        assert_eq!(collection.size().unwrap(), 0);
    }

    #[test]
    fn test_update_keeps_other_fields() {
        let collection = books();
        let id = collection.find(field("title").eq("1984")).unwrap().first().and_then(|d| d.id()).unwrap();
        let before = collection.get_by_id(&id).unwrap();

        collection.update_one(field("title").eq("1984"), &doc! { price: 14.99 }).unwrap();
        let mut after = collection.get_by_id(&id).unwrap();
        assert_eq!(after.get("price"), Some(&Value::from(14.99)));
        after.put("price", 12.0).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn test_delete_without_match_is_noop() {
        let collection = books();
        let result = collection
            .delete_one(field("title").eq("The Catcher in the Rye"))
            .unwrap();
        assert_eq!(result.modified_count(), 0);
        assert_eq!(result.matched_count(), 0);
        assert_eq!(collection.size().unwrap(), 2);
    }

    #[test]
    fn test_aggregate() {
        let collection = books();
        let result = collection
            .aggregate(vec![Stage::from(
                Group::by(Expression::field("genre")).avg("averagePrice", Expression::field("price")),
            )])
            .unwrap();
        assert_eq!(result.documents(), &[doc! { _id: "Fiction", averagePrice: 11.0 }]);
    }

    #[test]
    fn test_dropped_collection_rejects_operations() {
        let collection = books();
        let handle = collection.clone();
        collection.drop_contents();
        assert!(handle.is_dropped());
        assert_eq!(handle.find(all()).unwrap_err().kind(), &ErrorKind::NotFound);
        assert_eq!(
            handle.insert(doc! { title: "Dune" }).unwrap_err().kind(),
            &ErrorKind::NotFound
        );
    }
}
