use crate::collection::{Document, DocumentId};
use crate::common::{split_path, FieldPath, Value, DOC_ID};
use crate::errors::{ErrorKind, FolioError, FolioResult};
use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt::Display;

/// The fixed set of comparison operators a filter clause may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl ComparisonOp {
    /// Maps an operator key of a filter document (`$gt`, `$eq`, ...) to its
    /// comparison operator.
    pub fn from_operator(key: &str) -> Option<ComparisonOp> {
        match key {
            "$eq" => Some(ComparisonOp::Equals),
            "$ne" => Some(ComparisonOp::NotEquals),
            "$gt" => Some(ComparisonOp::GreaterThan),
            "$gte" => Some(ComparisonOp::GreaterOrEqual),
            "$lt" => Some(ComparisonOp::LessThan),
            "$lte" => Some(ComparisonOp::LessOrEqual),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Equals => "==",
            ComparisonOp::NotEquals => "!=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterOrEqual => ">=",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessOrEqual => "<=",
        }
    }

    /// Evaluates the operator against a field value that may be absent.
    ///
    /// Equality treats a missing field as null. Ordering operators only
    /// match values of a compatible type and never match a missing field.
    pub fn test(&self, actual: Option<&Value>, expected: &Value) -> bool {
        match self {
            ComparisonOp::Equals => Self::equals(actual, expected),
            ComparisonOp::NotEquals => !Self::equals(actual, expected),
            ComparisonOp::GreaterThan => Self::ordering(actual, expected) == Some(Ordering::Greater),
            ComparisonOp::GreaterOrEqual => {
                matches!(Self::ordering(actual, expected), Some(Ordering::Greater | Ordering::Equal))
            }
            ComparisonOp::LessThan => Self::ordering(actual, expected) == Some(Ordering::Less),
            ComparisonOp::LessOrEqual => {
                matches!(Self::ordering(actual, expected), Some(Ordering::Less | Ordering::Equal))
            }
        }
    }

    #[inline]
    fn equals(actual: Option<&Value>, expected: &Value) -> bool {
        match actual {
            Some(value) => value == expected,
            None => expected.is_null(),
        }
    }

    #[inline]
    fn ordering(actual: Option<&Value>, expected: &Value) -> Option<Ordering> {
        actual.and_then(|value| value.compare_compatible(expected))
    }
}

/// A single `field <op> value` clause of a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCondition {
    field_name: String,
    op: ComparisonOp,
    value: Value,
}

impl FieldCondition {
    pub fn new(field_name: &str, op: ComparisonOp, value: Value) -> Self {
        FieldCondition {
            field_name: field_name.to_string(),
            op,
            value,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_equality(&self) -> bool {
        self.op == ComparisonOp::Equals
    }
}

impl Display for FieldCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.field_name, self.op.symbol(), self.value)
    }
}

/// A conjunction of field conditions.
///
/// An empty filter matches every document. Filters are built with the
/// fluent API (`field("genre").eq("Fiction")`), combined with [`Filter::and`],
/// or parsed from a filter document with [`Filter::from_document`].
///
/// Evaluation never fails: comparing values of incompatible types simply
/// does not match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<FieldCondition>,
}

impl Filter {
    pub(crate) fn from_condition(condition: FieldCondition) -> Self {
        Filter {
            conditions: vec![condition],
        }
    }

    pub(crate) fn from_conditions(conditions: Vec<FieldCondition>) -> Self {
        Filter { conditions }
    }

    /// Parses a filter document.
    ///
    /// Each field maps either to a literal (equality) or to an operator
    /// document whose keys are drawn from `$eq`, `$ne`, `$gt`, `$gte`, `$lt`
    /// and `$lte`.
    ///
    /// ```rust
    /// use folio::doc;
    /// use folio::filter::Filter;
    ///
    /// let filter = Filter::from_document(&doc! {
    ///     in_stock: true,
    ///     published_year: { "$gt": 2010 }
    /// }).unwrap();
    /// assert_eq!(filter.conditions().len(), 2);
    ///
    /// assert!(Filter::from_document(&doc! { price: { "$regex": "1.*" } }).is_err());
    /// ```
    pub fn from_document(document: &Document) -> FolioResult<Filter> {
        let mut conditions = Vec::with_capacity(document.size());
        for (field_name, value) in document.iter() {
            if field_name.starts_with('$') {
                log::error!("Unsupported top level filter operator {}", field_name);
                return Err(FolioError::new(
                    &format!("Unsupported top level filter operator {}", field_name),
                    ErrorKind::InvalidArgument,
                ));
            }

            match value {
                Value::Document(operators) if operators.iter().any(|(k, _)| k.starts_with('$')) => {
                    for (operator, operand) in operators.iter() {
                        let op = ComparisonOp::from_operator(operator).ok_or_else(|| {
                            log::error!("Invalid operator {} on field {}", operator, field_name);
                            FolioError::new(
                                &format!("Invalid operator {} on field {}", operator, field_name),
                                ErrorKind::InvalidArgument,
                            )
                        })?;
                        conditions.push(FieldCondition::new(field_name, op, operand.clone()));
                    }
                }
                literal => conditions.push(FieldCondition::new(field_name, ComparisonOp::Equals, literal.clone())),
            }
        }
        Ok(Filter { conditions })
    }

    /// Returns a filter matching documents that satisfy both filters.
    pub fn and(mut self, other: Filter) -> Filter {
        self.conditions.extend(other.conditions);
        self
    }

    pub fn conditions(&self) -> &[FieldCondition] {
        &self.conditions
    }

    /// `true` if this filter places no restriction on documents.
    pub fn is_all(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluates this filter against a document, splitting field names on
    /// `separator`.
    pub fn apply(&self, document: &Document, separator: &str) -> bool {
        self.bind(separator).apply(document)
    }

    /// Pre-splits the field paths so repeated evaluation does not re-parse
    /// them.
    pub(crate) fn bind(&self, separator: &str) -> BoundFilter<'_> {
        BoundFilter {
            clauses: self
                .conditions
                .iter()
                .map(|condition| (split_path(&condition.field_name, separator), condition))
                .collect(),
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.conditions.is_empty() {
            write!(f, "AllFilter")
        } else {
            write!(f, "{}", self.conditions.iter().join(" && "))
        }
    }
}

/// A filter whose field paths are already split for a given separator.
pub(crate) struct BoundFilter<'a> {
    clauses: Vec<(FieldPath, &'a FieldCondition)>,
}

impl BoundFilter<'_> {
    pub fn apply(&self, document: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(path, condition)| condition.op.test(document.get_path(path), &condition.value))
    }
}

/// Creates a filter that matches every document.
pub fn all() -> Filter {
    Filter::default()
}

/// Creates a filter matching the document with the given identifier.
pub fn by_id(id: DocumentId) -> Filter {
    Filter::from_condition(FieldCondition::new(DOC_ID, ComparisonOp::Equals, Value::Id(id)))
}

/// Combines filters conjunctively.
pub fn and(filters: Vec<Filter>) -> Filter {
    Filter::from_conditions(filters.into_iter().flat_map(|f| f.conditions).collect())
}
