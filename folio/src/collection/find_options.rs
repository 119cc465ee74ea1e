use crate::collection::Projection;
use crate::common::{SortOrder, SortableFields};
use crate::errors::{ErrorKind, FolioError, FolioResult};
use icu_collator::options::CollatorOptions;
use icu_collator::CollatorPreferences;

/// Options controlling how query results are shaped: sort, pagination,
/// projection and string collation.
///
/// Skip and limit are signed so that a negative value can be reported as
/// `InvalidArgument` instead of wrapping. A skip or limit of zero is a
/// no-op.
///
/// # Examples
///
/// ```rust
/// use folio::collection::{order_by, Projection};
/// use folio::common::SortOrder;
///
/// let options = order_by("price", SortOrder::Descending)
///     .sort_by("title".to_string(), SortOrder::Ascending)
///     .skip(10)
///     .limit(5)
///     .projection(Projection::include(vec!["title", "price"]));
/// ```
#[derive(Default)]
pub struct FindOptions {
    pub(crate) sort_by: Option<SortableFields>,
    pub(crate) skip: Option<i64>,
    pub(crate) limit: Option<i64>,
    pub(crate) projection: Option<Projection>,
    pub(crate) collator_options: Option<CollatorOptions>,
    pub(crate) collator_preferences: Option<CollatorPreferences>,
}

/// Creates find options sorting on a single field.
pub fn order_by(field_name: &str, sort_order: SortOrder) -> FindOptions {
    FindOptions::new().sort_by(field_name.to_string(), sort_order)
}

/// Creates find options skipping the first `skip` results.
pub fn skip_by(skip: i64) -> FindOptions {
    FindOptions::new().skip(skip)
}

/// Creates find options returning at most `limit` results.
pub fn limit_to(limit: i64) -> FindOptions {
    FindOptions::new().limit(limit)
}

impl FindOptions {
    pub fn new() -> FindOptions {
        FindOptions::default()
    }

    pub fn skip(mut self, skip: i64) -> FindOptions {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: i64) -> FindOptions {
        self.limit = Some(limit);
        self
    }

    /// Appends a sort key. Keys are compared in the order they were added.
    pub fn sort_by(mut self, field_name: String, sort_order: SortOrder) -> FindOptions {
        let fields = self.sort_by.unwrap_or_default();
        self.sort_by = Some(fields.add_sorted_field(field_name, sort_order));
        self
    }

    /// Replaces the sort specification.
    pub fn sort(mut self, sortable_fields: SortableFields) -> FindOptions {
        self.sort_by = Some(sortable_fields);
        self
    }

    pub fn projection(mut self, projection: Projection) -> FindOptions {
        self.projection = Some(projection);
        self
    }

    /// Compares string sort keys with a locale-aware collator instead of
    /// by code point.
    pub fn collator_options(mut self, collator: CollatorOptions) -> FindOptions {
        self.collator_options = Some(collator);
        self
    }

    pub fn collator_preferences(mut self, collator: CollatorPreferences) -> FindOptions {
        self.collator_preferences = Some(collator);
        self
    }

    pub fn sort_order(&self) -> Option<&SortableFields> {
        self.sort_by.as_ref()
    }

    /// Validated skip count; zero when unset.
    pub(crate) fn skip_count(&self) -> FolioResult<usize> {
        Self::non_negative("skip", self.skip).map(|skip| skip.unwrap_or(0))
    }

    /// Validated limit; `None` when unset or zero.
    pub(crate) fn limit_count(&self) -> FolioResult<Option<usize>> {
        Self::non_negative("limit", self.limit).map(|limit| limit.filter(|l| *l > 0))
    }

    fn non_negative(name: &str, value: Option<i64>) -> FolioResult<Option<usize>> {
        match value {
            Some(v) if v < 0 => {
                log::error!("{} cannot be negative, got {}", name, v);
                Err(FolioError::new(
                    &format!("{} cannot be negative, got {}", name, v),
                    ErrorKind::InvalidArgument,
                ))
            }
            Some(v) => usize::try_from(v).map(Some).map_err(|_| {
                log::error!("{} {} does not fit in memory", name, v);
                FolioError::new(
                    &format!("{} {} is too large", name, v),
                    ErrorKind::InvalidArgument,
                )
            }),
            None => Ok(None),
        }
    }
}
