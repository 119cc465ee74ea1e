use crate::aggregate::Expression;
use crate::common::Value;
use crate::errors::{ErrorKind, FolioError, FolioResult};
use std::fmt::{Display, Formatter};

/// Reduces the documents of one group to a single value.
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// Sum of a numeric expression. `Sum(literal(1))` counts documents.
    Sum(Expression),
    /// Arithmetic mean of a numeric expression
    Avg(Expression),
    /// Number of documents in the group
    Count,
}

impl Accumulator {
    pub(crate) fn expression(&self) -> Option<&Expression> {
        match self {
            Accumulator::Sum(expression) | Accumulator::Avg(expression) => Some(expression),
            Accumulator::Count => None,
        }
    }

    pub(crate) fn new_state(&self) -> AccumulatorState {
        AccumulatorState {
            int_total: Some(0),
            float_total: 0.0,
            count: 0,
        }
    }

    pub(crate) fn result(&self, state: &AccumulatorState) -> Value {
        match self {
            Accumulator::Sum(_) => state.sum(),
            Accumulator::Avg(_) => state.average(),
            Accumulator::Count => Value::I64(state.count as i64),
        }
    }
}

impl Display for Accumulator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Accumulator::Sum(expression) => write!(f, "sum({})", expression),
            Accumulator::Avg(expression) => write!(f, "avg({})", expression),
            Accumulator::Count => write!(f, "count()"),
        }
    }
}

/// Running totals of one accumulator within one group.
///
/// The integer total is kept alongside the float total while every input is
/// an integer and the sum does not overflow, so integer sums stay exact.
/// The average is a single division at the end.
#[derive(Debug, Clone)]
pub(crate) struct AccumulatorState {
    int_total: Option<i64>,
    float_total: f64,
    count: usize,
}

impl AccumulatorState {
    /// Adds one input. `None` counts a document for `Count`, which reads no
    /// field.
    pub fn add(&mut self, value: Option<&Value>) -> FolioResult<()> {
        match value {
            None => {}
            Some(Value::I64(i)) => {
                self.int_total = self.int_total.and_then(|total| total.checked_add(*i));
                self.float_total += *i as f64;
            }
            Some(Value::F64(f)) => {
                self.int_total = None;
                self.float_total += f;
            }
            Some(other) => {
                return Err(FolioError::new(
                    &format!("Cannot accumulate a value of type {}", other.type_name()),
                    ErrorKind::TypeMismatch,
                ));
            }
        }
        self.count += 1;
        Ok(())
    }

    fn sum(&self) -> Value {
        match self.int_total {
            Some(total) => Value::I64(total),
            None => Value::F64(self.float_total),
        }
    }

    fn average(&self) -> Value {
        if self.count == 0 {
            return Value::Null;
        }
        let total = match self.int_total {
            Some(total) => total as f64,
            None => self.float_total,
        };
        Value::F64(total / self.count as f64)
    }
}

/// Sums a numeric expression over a group.
pub fn sum(expression: Expression) -> Accumulator {
    Accumulator::Sum(expression)
}

/// Averages a numeric expression over a group.
pub fn avg(expression: Expression) -> Accumulator {
    Accumulator::Avg(expression)
}

/// Counts the documents of a group.
pub fn count() -> Accumulator {
    Accumulator::Count
}
