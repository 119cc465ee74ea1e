use crate::collection::operation::IndexManager;
use crate::collection::{DocumentId, ScanStrategy};
use crate::common::{Fields, DOC_ID};
use crate::filter::{FieldCondition, Filter};
use crate::index::IndexKey;

/// Where the executor takes its candidate documents from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CandidateScan {
    FullScan,
    ById(DocumentId),
    Index { fields: Fields, key: IndexKey },
}

impl CandidateScan {
    pub fn strategy(&self) -> ScanStrategy {
        match self {
            CandidateScan::FullScan => ScanStrategy::FullScan,
            CandidateScan::ById(_) => ScanStrategy::IdLookup,
            CandidateScan::Index { fields, .. } => ScanStrategy::IndexLookup {
                fields: fields.clone(),
            },
        }
    }
}

/// A filter split into a candidate source and the conditions still to be
/// evaluated on every candidate.
#[derive(Debug, Clone)]
pub(crate) struct OptimizedFilter {
    pub scan: CandidateScan,
    pub residual: Filter,
}

/// Chooses how a conjunctive filter is executed.
///
/// An equality on `_id` with a document id pins a single document. Failing
/// that, an index is usable when every one of its fields has an equality
/// condition in the filter; among usable indexes the one covering the most
/// fields wins, and ties go to the first index in field order. Range
/// conditions never use an index.
pub(crate) struct FindOptimizer;

impl FindOptimizer {
    pub fn optimize(filter: &Filter, index_manager: &IndexManager) -> OptimizedFilter {
        let conditions = filter.conditions();

        if let Some(position) = conditions.iter().position(|c| {
            c.is_equality() && c.field_name() == DOC_ID && c.value().is_id()
        }) {
            if let Some(id) = conditions[position].value().as_id() {
                log::debug!("Using id lookup for {}", filter);
                return OptimizedFilter {
                    scan: CandidateScan::ById(id),
                    residual: Self::residual(conditions, &[position]),
                };
            }
        }

        let mut best: Option<(Fields, Vec<usize>)> = None;
        for index in index_manager.indexes() {
            let fields = index.descriptor().index_fields();
            if let Some(positions) = Self::covering_positions(fields, conditions) {
                let better = best
                    .as_ref()
                    .map(|(current, _)| fields.len() > current.len())
                    .unwrap_or(true);
                if better {
                    best = Some((fields.clone(), positions));
                }
            }
        }

        match best {
            Some((fields, positions)) => {
                let key: IndexKey = positions
                    .iter()
                    .map(|p| conditions[*p].value().clone())
                    .collect();
                log::debug!("Using index on {} with key {:?} for {}", fields, key, filter);
                OptimizedFilter {
                    scan: CandidateScan::Index { fields, key },
                    residual: Self::residual(conditions, &positions),
                }
            }
            None => {
                log::debug!("No usable index, full scan for {}", filter);
                OptimizedFilter {
                    scan: CandidateScan::FullScan,
                    residual: filter.clone(),
                }
            }
        }
    }

    /// Positions of one equality condition per index field, in index field
    /// order, or `None` if some field has no equality condition.
    fn covering_positions(fields: &Fields, conditions: &[FieldCondition]) -> Option<Vec<usize>> {
        let mut positions = Vec::with_capacity(fields.len());
        for field_name in fields.field_names() {
            let position = conditions.iter().enumerate().position(|(i, c)| {
                c.is_equality() && c.field_name() == field_name && !positions.contains(&i)
            })?;
            positions.push(position);
        }
        Some(positions)
    }

    fn residual(conditions: &[FieldCondition], consumed: &[usize]) -> Filter {
        Filter::from_conditions(
            conditions
                .iter()
                .enumerate()
                .filter(|(i, _)| !consumed.contains(i))
                .map(|(_, c)| c.clone())
                .collect(),
        )
    }
}
