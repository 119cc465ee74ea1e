use crate::collection::DocumentId;

/// Outcome of a mutation.
///
/// `matched_count` is the number of documents the filter selected;
/// the affected ids are the documents that were actually inserted, changed
/// or removed. An update whose patch leaves a document unchanged counts as
/// matched but not modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    document_ids: Vec<DocumentId>,
    matched_count: usize,
}

impl WriteResult {
    pub(crate) fn new(document_ids: Vec<DocumentId>, matched_count: usize) -> Self {
        Self {
            document_ids,
            matched_count,
        }
    }

    pub fn affected_document_ids(&self) -> &[DocumentId] {
        &self.document_ids
    }

    pub fn matched_count(&self) -> usize {
        self.matched_count
    }

    pub fn modified_count(&self) -> usize {
        self.document_ids.len()
    }
}

impl IntoIterator for WriteResult {
    type Item = DocumentId;
    type IntoIter = std::vec::IntoIter<DocumentId>;

    fn into_iter(self) -> Self::IntoIter {
        self.document_ids.into_iter()
    }
}
