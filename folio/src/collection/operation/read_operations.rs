use crate::collection::operation::find_optimizer::{CandidateScan, FindOptimizer};
use crate::collection::operation::IndexManager;
use crate::collection::{Document, DocumentId, FindOptions, FindPlan, ScanStrategy};
use crate::common::stream::sorted_stream::{create_collator, SortedStream};
use crate::common::DocumentCursor;
use crate::errors::{ErrorKind, FolioError, FolioResult};
use crate::filter::Filter;
use crate::store::DocumentStore;

/// Documents selected by a filter, in collection order, together with how
/// they were found.
pub(crate) struct Selection<'a> {
    pub matches: Vec<(DocumentId, &'a Document)>,
    pub strategy: ScanStrategy,
    pub residual: Filter,
    pub docs_examined: usize,
}

/// Read path of a collection: candidate selection, filtering, sort,
/// pagination and projection. Borrows the collection state under its
/// read lock.
pub(crate) struct ReadOperations<'a> {
    store: &'a DocumentStore,
    index_manager: &'a IndexManager,
    field_separator: &'a str,
}

impl<'a> ReadOperations<'a> {
    pub fn new(store: &'a DocumentStore, index_manager: &'a IndexManager, field_separator: &'a str) -> Self {
        ReadOperations {
            store,
            index_manager,
            field_separator,
        }
    }

    pub fn get_by_id(&self, id: &DocumentId) -> FolioResult<Document> {
        self.store.get(id).cloned().ok_or_else(|| {
            log::error!("No document found with id {}", id);
            FolioError::new(
                &format!("No document found with id {}", id),
                ErrorKind::NotFound,
            )
        })
    }

    /// Selects the documents matching `filter`, seeding candidates from an
    /// index when one covers the filter.
    pub fn select(&self, filter: &Filter) -> Selection<'a> {
        let store: &'a DocumentStore = self.store;
        let optimized = FindOptimizer::optimize(filter, self.index_manager);

        let candidates: Vec<(DocumentId, &'a Document)> = match &optimized.scan {
            CandidateScan::FullScan => store.iter().map(|(id, doc)| (*id, doc)).collect(),
            CandidateScan::ById(id) => store.get(id).map(|doc| vec![(*id, doc)]).unwrap_or_default(),
            CandidateScan::Index { fields, key } => {
                let mut ranked: Vec<(usize, DocumentId)> = self
                    .index_manager
                    .lookup(fields, key)
                    .map(|ids| {
                        ids.iter()
                            .filter_map(|id| store.position(id).map(|rank| (rank, *id)))
                            .collect()
                    })
                    .unwrap_or_default();
                // restore collection order, the index keeps ids in a hash set
                ranked.sort_unstable_by_key(|(rank, _)| *rank);
                ranked
                    .into_iter()
                    .filter_map(|(_, id)| store.get(&id).map(|doc| (id, doc)))
                    .collect()
            }
        };

        let docs_examined = candidates.len();
        let matches = {
            let bound = optimized.residual.bind(self.field_separator);
            candidates.into_iter().filter(|(_, doc)| bound.apply(doc)).collect()
        };

        Selection {
            matches,
            strategy: optimized.scan.strategy(),
            residual: optimized.residual,
            docs_examined,
        }
    }

    /// Runs a query: filter, then sort, then skip and limit, then
    /// projection.
    pub fn find(&self, filter: &Filter, find_options: &FindOptions) -> FolioResult<DocumentCursor> {
        let skip = find_options.skip_count()?;
        let limit = find_options.limit_count()?;
        let sort_order = find_options
            .sort_by
            .as_ref()
            .filter(|sort| !sort.is_empty());
        let collator = match sort_order {
            Some(_) => create_collator(find_options.collator_options, find_options.collator_preferences)?,
            None => None,
        };

        let selection = self.select(filter);
        let documents = selection.matches.into_iter().map(|(_, doc)| doc.clone());

        let ordered: Box<dyn Iterator<Item = Document>> = match sort_order {
            Some(sort) => Box::new(SortedStream::new(
                documents,
                sort.sorting_order(),
                self.field_separator,
                collator.as_ref(),
            )),
            None => Box::new(documents),
        };

        let page: Vec<Document> = ordered.skip(skip).take(limit.unwrap_or(usize::MAX)).collect();
        let n_returned = page.len();

        let page = match &find_options.projection {
            Some(projection) => page
                .iter()
                .map(|doc| projection.apply(doc, self.field_separator))
                .collect::<FolioResult<Vec<Document>>>()?,
            None => page,
        };

        let find_plan = FindPlan::new(
            selection.strategy,
            selection.residual,
            selection.docs_examined,
            n_returned,
        );
        log::debug!("Executed find: {}", find_plan);
        Ok(DocumentCursor::new(page, find_plan))
    }
}
