use crate::aggregate::Stage;
use crate::collection::operation::ReadOperations;
use crate::collection::Document;
use crate::common::stream::sorted_stream::SortedStream;
use crate::errors::{FolioError, FolioResult};
use crate::filter::all;

/// Output of an aggregation: the result documents, plus the type mismatches
/// that caused input documents to be skipped along the way.
#[derive(Debug, Clone)]
pub struct AggregateResult {
    documents: Vec<Document>,
    type_mismatches: Vec<FolioError>,
}

impl AggregateResult {
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    pub fn type_mismatches(&self) -> &[FolioError] {
        &self.type_mismatches
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn first(&self) -> Option<&Document> {
        self.documents.first()
    }
}

impl IntoIterator for AggregateResult {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

/// Runs a list of stages over the documents of one collection.
///
/// Every stage is validated before any runs. A leading `Match` selects its
/// input through the read path, so it is served by an index when one
/// covers the filter.
pub(crate) struct AggregationPipeline<'a> {
    read_operations: ReadOperations<'a>,
    field_separator: &'a str,
}

impl<'a> AggregationPipeline<'a> {
    pub fn new(read_operations: ReadOperations<'a>, field_separator: &'a str) -> Self {
        AggregationPipeline {
            read_operations,
            field_separator,
        }
    }

    pub fn execute(&self, stages: &[Stage]) -> FolioResult<AggregateResult> {
        for stage in stages {
            stage.validate()?;
        }

        let (selection, remaining) = match stages.split_first() {
            Some((Stage::Match(filter), rest)) => (self.read_operations.select(filter), rest),
            _ => (self.read_operations.select(&all()), stages),
        };
        let mut documents: Vec<Document> = selection
            .matches
            .into_iter()
            .map(|(_, document)| document.clone())
            .collect();

        let mut type_mismatches = Vec::new();
        for stage in remaining {
            documents = self.run_stage(stage, documents, &mut type_mismatches)?;
        }

        log::debug!(
            "Aggregation of {} stages returned {} documents, {} skipped inputs",
            stages.len(),
            documents.len(),
            type_mismatches.len()
        );
        Ok(AggregateResult {
            documents,
            type_mismatches,
        })
    }

    fn run_stage(
        &self,
        stage: &Stage,
        documents: Vec<Document>,
        type_mismatches: &mut Vec<FolioError>,
    ) -> FolioResult<Vec<Document>> {
        let separator = self.field_separator;
        let output = match stage {
            Stage::Match(filter) => {
                let bound = filter.bind(separator);
                documents.into_iter().filter(|doc| bound.apply(doc)).collect()
            }
            Stage::Group(group) => group.execute(documents, separator, type_mismatches)?,
            Stage::Sort(sort) => {
                SortedStream::new(documents.into_iter(), sort.sorting_order(), separator, None).collect()
            }
            Stage::Skip(n) => documents.into_iter().skip(*n as usize).collect(),
            Stage::Limit(0) => documents,
            Stage::Limit(n) => documents.into_iter().take(*n as usize).collect(),
            Stage::Project(projection) => documents
                .iter()
                .map(|doc| projection.apply(doc, separator))
                .collect::<FolioResult<Vec<Document>>>()?,
        };
        Ok(output)
    }
}
