use crate::common::{SortOrder, NAME_SEPARATOR};
use crate::errors::{ErrorKind, FolioError, FolioResult};
use smallvec::SmallVec;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

/// Segments of a dotted field path, e.g. `_id.decade` -> `["_id", "decade"]`.
pub type FieldPath = SmallVec<[String; 4]>;

/// Splits a field name into path segments on the configured separator.
pub fn split_path(field_name: &str, separator: &str) -> FieldPath {
    if separator.is_empty() || !field_name.contains(separator) {
        let mut path = FieldPath::new();
        path.push(field_name.to_string());
        return path;
    }
    field_name.split(separator).map(str::to_string).collect()
}

/// An ordered tuple of field names, used to identify single-field and
/// compound indexes.
///
/// # Example
///
/// ```ignore
/// let fields = Fields::with_names(vec!["author", "published_year"])?;
/// assert_eq!(fields.encoded_names(), "author|published_year");
/// ```
#[derive(Clone, Debug, Eq)]
pub struct Fields {
    inner: Arc<FieldsInner>,
}

impl Fields {
    /// Creates a new Fields instance with the provided field names.
    pub fn with_names(field_names: Vec<&str>) -> FolioResult<Fields> {
        if field_names.is_empty() {
            log::error!("Field names cannot be empty");
            return Err(FolioError::new(
                "Field names cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }

        if field_names.iter().any(|name| name.is_empty()) {
            log::error!("Field names cannot contain an empty name: {:?}", field_names);
            return Err(FolioError::new(
                "Field names cannot contain an empty name",
                ErrorKind::InvalidArgument,
            ));
        }

        let mut seen = Vec::with_capacity(field_names.len());
        for name in &field_names {
            if seen.contains(name) {
                log::error!("Field {} appears more than once", name);
                return Err(FolioError::new(
                    &format!("Field {} appears more than once", name),
                    ErrorKind::InvalidArgument,
                ));
            }
            seen.push(*name);
        }

        Ok(Fields {
            inner: Arc::new(FieldsInner {
                field_names: field_names.iter().map(|s| s.to_string()).collect(),
            }),
        })
    }

    /// Returns the list of field names.
    pub fn field_names(&self) -> &[String] {
        &self.inner.field_names
    }

    /// Returns the encoded representation of field names separated by NAME_SEPARATOR.
    pub fn encoded_names(&self) -> String {
        self.inner.field_names.join(NAME_SEPARATOR)
    }

    pub fn len(&self) -> usize {
        self.inner.field_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.field_names.is_empty()
    }
}

impl Display for Fields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encoded_names())
    }
}

impl Ord for Fields {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.field_names.cmp(&other.inner.field_names)
    }
}

impl PartialOrd for Fields {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Fields {
    fn eq(&self, other: &Self) -> bool {
        self.inner.field_names == other.inner.field_names
    }
}

impl Hash for Fields {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.field_names.hash(state);
    }
}

#[derive(Debug, Eq, PartialEq)]
struct FieldsInner {
    field_names: Vec<String>,
}

/// Ordered list of `(field, direction)` pairs describing a multi-key sort.
///
/// Keys are compared left to right; documents equal on every key keep
/// their original relative order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SortableFields {
    sorting_order: Vec<(String, SortOrder)>,
}

impl SortableFields {
    pub fn new() -> SortableFields {
        SortableFields {
            sorting_order: Vec::new(),
        }
    }

    #[inline]
    pub fn add_field(self, field_name: String) -> SortableFields {
        self.add_sorted_field(field_name, SortOrder::Ascending)
    }

    #[inline]
    pub fn add_sorted_field(mut self, field_name: String, sort_order: SortOrder) -> SortableFields {
        self.sorting_order.push((field_name, sort_order));
        self
    }

    #[inline]
    pub fn sorting_order(&self) -> &[(String, SortOrder)] {
        &self.sorting_order
    }

    pub fn is_empty(&self) -> bool {
        self.sorting_order.is_empty()
    }
}
