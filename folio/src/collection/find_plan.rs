use crate::common::Fields;
use crate::filter::Filter;
use std::fmt::Display;

/// How the query executor produced its candidate documents.
#[derive(Clone, Debug, PartialEq)]
pub enum ScanStrategy {
    /// Every document of the collection was a candidate.
    FullScan,
    /// The filter pinned `_id`, so at most one document was a candidate.
    IdLookup,
    /// Candidates were seeded from the equality index on `fields`.
    IndexLookup { fields: Fields },
}

/// Execution report of a query, as returned by `explain`.
///
/// `docs_examined` counts the candidate documents the predicate evaluator
/// looked at: the whole collection for a full scan, only the looked-up
/// identifiers for an index or id lookup.
#[derive(Clone, Debug)]
pub struct FindPlan {
    strategy: ScanStrategy,
    residual_filter: Filter,
    docs_examined: usize,
    n_returned: usize,
}

impl FindPlan {
    pub(crate) fn new(
        strategy: ScanStrategy,
        residual_filter: Filter,
        docs_examined: usize,
        n_returned: usize,
    ) -> Self {
        FindPlan {
            strategy,
            residual_filter,
            docs_examined,
            n_returned,
        }
    }

    pub fn strategy(&self) -> &ScanStrategy {
        &self.strategy
    }

    pub fn is_index_scan(&self) -> bool {
        matches!(self.strategy, ScanStrategy::IndexLookup { .. })
    }

    /// Fields of the index used to seed candidates, if any.
    pub fn index_fields(&self) -> Option<&Fields> {
        match &self.strategy {
            ScanStrategy::IndexLookup { fields } => Some(fields),
            _ => None,
        }
    }

    /// Conditions evaluated on every candidate after the index lookup.
    pub fn residual_filter(&self) -> &Filter {
        &self.residual_filter
    }

    pub fn docs_examined(&self) -> usize {
        self.docs_examined
    }

    /// Number of documents left after filtering and pagination.
    pub fn n_returned(&self) -> usize {
        self.n_returned
    }
}

impl Display for FindPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.strategy {
            ScanStrategy::FullScan => write!(f, "COLLSCAN")?,
            ScanStrategy::IdLookup => write!(f, "IDSCAN")?,
            ScanStrategy::IndexLookup { fields } => write!(f, "IXSCAN({})", fields)?,
        }
        write!(
            f,
            " filter: {}, examined: {}, returned: {}",
            self.residual_filter, self.docs_examined, self.n_returned
        )
    }
}
