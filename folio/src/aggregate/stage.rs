use crate::aggregate::Group;
use crate::collection::Projection;
use crate::common::{SortOrder, SortableFields};
use crate::errors::{ErrorKind, FolioError, FolioResult};
use crate::filter::Filter;
use std::fmt::{Display, Formatter};

/// One step of an aggregation pipeline. Each stage consumes the complete
/// output of the previous one.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Keeps documents matching a filter
    Match(Filter),
    /// Groups documents and computes accumulators per group
    Group(Group),
    /// Orders documents, stable on ties
    Sort(SortableFields),
    /// Drops the first n documents
    Skip(i64),
    /// Keeps at most n documents; 0 keeps everything
    Limit(i64),
    /// Reshapes every document
    Project(Projection),
}

impl Stage {
    /// A sort stage on a single field.
    pub fn sort_by(field_name: &str, sort_order: SortOrder) -> Stage {
        Stage::Sort(SortableFields::new().add_sorted_field(field_name.to_string(), sort_order))
    }

    pub(crate) fn validate(&self) -> FolioResult<()> {
        match self {
            Stage::Group(group) => group.validate(),
            Stage::Skip(n) | Stage::Limit(n) if *n < 0 => {
                log::error!("Negative count in aggregation stage {}", self);
                Err(FolioError::new(
                    &format!("Negative count in aggregation stage {}", self),
                    ErrorKind::InvalidArgument,
                ))
            }
            Stage::Sort(sort) if sort.is_empty() => {
                log::error!("Sort stage without sort fields");
                Err(FolioError::new(
                    "Sort stage without sort fields",
                    ErrorKind::InvalidArgument,
                ))
            }
            _ => Ok(()),
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Match(filter) => write!(f, "match {}", filter),
            Stage::Group(group) => write!(f, "{}", group),
            Stage::Sort(sort) => {
                write!(f, "sort")?;
                for (field_name, order) in sort.sorting_order() {
                    write!(f, " {} {:?}", field_name, order)?;
                }
                Ok(())
            }
            Stage::Skip(n) => write!(f, "skip {}", n),
            Stage::Limit(n) => write!(f, "limit {}", n),
            Stage::Project(projection) => write!(f, "project {:?}", projection.fields()),
        }
    }
}

impl From<Group> for Stage {
    fn from(group: Group) -> Self {
        Stage::Group(group)
    }
}

impl From<Filter> for Stage {
    fn from(filter: Filter) -> Self {
        Stage::Match(filter)
    }
}

impl From<Projection> for Stage {
    fn from(projection: Projection) -> Self {
        Stage::Project(projection)
    }
}
