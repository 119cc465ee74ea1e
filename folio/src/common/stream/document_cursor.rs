use crate::collection::{Document, FindPlan};
use std::fmt::{Debug, Formatter};

/// The materialized result of a query.
///
/// A cursor is produced by [`Collection::find`](crate::collection::Collection::find)
/// from a consistent snapshot of the collection, so later mutations of the
/// collection never change what an existing cursor yields. It also carries
/// the [FindPlan] the executor chose, for inspection.
pub struct DocumentCursor {
    documents: Vec<Document>,
    current_index: usize,
    find_plan: FindPlan,
}

impl DocumentCursor {
    pub(crate) fn new(documents: Vec<Document>, find_plan: FindPlan) -> Self {
        DocumentCursor {
            documents,
            current_index: 0,
            find_plan,
        }
    }

    /// Rewinds the cursor to its first document.
    pub fn reset(&mut self) {
        self.current_index = 0;
    }

    /// Total number of documents in the result, regardless of the
    /// current position.
    pub fn size(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Rewinds and returns the first document, if any.
    pub fn first(&mut self) -> Option<Document> {
        self.reset();
        self.next()
    }

    pub fn find_plan(&self) -> &FindPlan {
        &self.find_plan
    }

    /// Consumes the cursor, returning every document of the result.
    pub fn into_vec(self) -> Vec<Document> {
        self.documents
    }
}

impl Debug for DocumentCursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCursor")
            .field("size", &self.documents.len())
            .field("position", &self.current_index)
            .field("find_plan", &self.find_plan)
            .finish()
    }
}

impl Iterator for DocumentCursor {
    type Item = Document;

    fn next(&mut self) -> Option<Self::Item> {
        let document = self.documents.get(self.current_index).cloned();
        if document.is_some() {
            self.current_index += 1;
        }
        document
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.documents.len() - self.current_index;
        (remaining, Some(remaining))
    }
}
