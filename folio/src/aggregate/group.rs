use crate::aggregate::accumulator::AccumulatorState;
use crate::aggregate::{Accumulator, Expression};
use crate::collection::Document;
use crate::common::{Value, DOC_ID};
use crate::errors::{ErrorKind, FolioError, FolioResult};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// A grouping stage: partitions its input by a key expression and emits one
/// document per group, holding the key under `_id` and one field per
/// accumulator.
///
/// Groups are emitted in the order their first document was seen. A
/// document whose key is missing belongs to no group. A document whose
/// accumulator argument is missing is left out of that accumulator only.
///
/// # Examples
///
/// ```rust
/// use folio::aggregate::{Expression, Group};
///
/// let by_author = Group::by(Expression::field("author"))
///     .sum("count", Expression::literal(1))
///     .avg("averagePrice", Expression::field("price"));
/// assert_eq!(by_author.accumulators().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    key: Expression,
    accumulators: Vec<(String, Accumulator)>,
}

impl Group {
    pub fn by(key: Expression) -> Group {
        Group {
            key,
            accumulators: Vec::new(),
        }
    }

    pub fn accumulate(mut self, name: &str, accumulator: Accumulator) -> Group {
        self.accumulators.push((name.to_string(), accumulator));
        self
    }

    pub fn sum(self, name: &str, expression: Expression) -> Group {
        self.accumulate(name, Accumulator::Sum(expression))
    }

    pub fn avg(self, name: &str, expression: Expression) -> Group {
        self.accumulate(name, Accumulator::Avg(expression))
    }

    pub fn count(self, name: &str) -> Group {
        self.accumulate(name, Accumulator::Count)
    }

    pub fn key(&self) -> &Expression {
        &self.key
    }

    pub fn accumulators(&self) -> &[(String, Accumulator)] {
        &self.accumulators
    }

    /// Output field names must be non-empty, unique and distinct from `_id`.
    pub(crate) fn validate(&self) -> FolioResult<()> {
        let mut seen = HashSet::new();
        for (name, _) in &self.accumulators {
            if name.is_empty() || name == DOC_ID || !seen.insert(name.as_str()) {
                log::error!("Invalid accumulator name '{}' in group by {}", name, self.key);
                return Err(FolioError::new(
                    &format!("Invalid accumulator name '{}' in group by {}", name, self.key),
                    ErrorKind::InvalidArgument,
                ));
            }
        }
        Ok(())
    }

    /// Groups `documents`. Type mismatches skip the offending document for
    /// the affected key or accumulator and are pushed onto `mismatches`.
    pub(crate) fn execute(
        &self,
        documents: Vec<Document>,
        separator: &str,
        mismatches: &mut Vec<FolioError>,
    ) -> FolioResult<Vec<Document>> {
        let mut groups: IndexMap<Value, Vec<AccumulatorState>> = IndexMap::new();

        for document in &documents {
            let key = match self.key.evaluate(document, separator) {
                Ok(Some(key)) => key,
                Ok(None) => continue,
                Err(err) if err.kind() == &ErrorKind::TypeMismatch => {
                    mismatches.push(skipped(document, "group key", err));
                    continue;
                }
                Err(err) => return Err(err),
            };

            let states = groups.entry(key).or_insert_with(|| {
                self.accumulators
                    .iter()
                    .map(|(_, accumulator)| accumulator.new_state())
                    .collect()
            });

            for ((name, accumulator), state) in self.accumulators.iter().zip(states.iter_mut()) {
                let input = match accumulator.expression() {
                    None => None,
                    Some(expression) => match expression.evaluate(document, separator) {
                        Ok(Some(value)) => Some(value),
                        Ok(None) => continue,
                        Err(err) if err.kind() == &ErrorKind::TypeMismatch => {
                            mismatches.push(skipped(document, name, err));
                            continue;
                        }
                        Err(err) => return Err(err),
                    },
                };
                if let Err(err) = state.add(input.as_ref()) {
                    mismatches.push(skipped(document, name, err));
                }
            }
        }

        log::debug!(
            "Grouped {} documents by {} into {} groups",
            documents.len(),
            self.key,
            groups.len()
        );

        let mut output = Vec::with_capacity(groups.len());
        for (key, states) in groups {
            let mut group = Document::new();
            group.put(DOC_ID, key)?;
            for ((name, accumulator), state) in self.accumulators.iter().zip(states.iter()) {
                group.put(name.as_str(), accumulator.result(state))?;
            }
            output.push(group);
        }
        Ok(output)
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "group by {}", self.key)?;
        for (name, accumulator) in &self.accumulators {
            write!(f, ", {} = {}", name, accumulator)?;
        }
        Ok(())
    }
}

fn skipped(document: &Document, target: &str, cause: FolioError) -> FolioError {
    let document_id = match document.id() {
        Some(id) => id.to_string(),
        None => "without id".to_string(),
    };
    let message = format!("Skipped document {} for {}: {}", document_id, target, cause);
    log::warn!("{}", message);
    FolioError::new_with_cause(&message, ErrorKind::TypeMismatch, cause)
}
