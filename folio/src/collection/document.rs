use im::OrdMap;
use smallvec::SmallVec;

use crate::collection::DocumentId;
use crate::common::{Value, DOC_ID};
use crate::errors::{ErrorKind, FolioError, FolioResult};
use itertools::Itertools;
use std::borrow::Cow;
use std::fmt::{Debug, Display};

type FieldVec = SmallVec<[String; 8]>;

/// A schema-less record made of field name / [Value] pairs.
///
/// Values may themselves be documents or arrays, so a document is a tree.
/// Embedded fields are reached with path accessors such as
/// [`Document::get_path`], where each segment names one level of nesting
/// and numeric segments index into arrays.
///
/// The `_id` field is reserved. In a stored document it holds the
/// [DocumentId] assigned on insert; documents produced by an aggregation
/// pipeline reuse it for the group key.
///
/// Documents are backed by `im::OrdMap`, a persistent ordered map, so
/// cloning a document (which every query result does) is O(1) and
/// mutations share structure with the original.
#[derive(Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates the specified [Value] with a top-level key.
    ///
    /// Fails with `InvalidArgument` if the key is empty.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut doc = Document::new();
    /// doc.put("title", "1984")?;
    /// doc.put("price", 12.0)?;
    /// assert_eq!(doc.size(), 2);
    /// ```
    pub fn put<'a, T: Into<Value>>(&mut self, key: impl Into<Cow<'a, str>>, value: T) -> FolioResult<()> {
        let key = key.into();
        // key cannot be empty
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(FolioError::new(
                "Document does not support empty key",
                ErrorKind::InvalidArgument,
            ));
        }

        self.data.insert(key.into_owned(), value.into());
        Ok(())
    }

    /// Returns the value of a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns the value at an embedded field path.
    ///
    /// Document segments select a field, numeric segments select an array
    /// element. Any other shape along the way yields `None`.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.data.get(first.as_ref())?;
        for segment in rest {
            current = match current {
                Value::Document(doc) => doc.get(segment.as_ref())?,
                Value::Array(array) => {
                    let index = segment.as_ref().parse::<usize>().ok()?;
                    array.get(index)?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    /// Sets the value at an embedded field path, creating intermediate
    /// documents as needed.
    ///
    /// Fails with `InvalidArgument` if an intermediate segment already holds
    /// something other than a document.
    pub fn put_path<S: AsRef<str>>(&mut self, path: &[S], value: Value) -> FolioResult<()> {
        match path {
            [] => {
                log::error!("Cannot put a value on an empty field path");
                Err(FolioError::new(
                    "Cannot put a value on an empty field path",
                    ErrorKind::InvalidArgument,
                ))
            }
            [key] => self.put(key.as_ref(), value),
            [first, rest @ ..] => {
                let key = first.as_ref();
                if !self.data.contains_key(key) {
                    self.put(key, Document::new())?;
                }

                match self.data.get_mut(key) {
                    Some(Value::Document(embedded)) => embedded.put_path(rest, value),
                    Some(other) => {
                        log::error!("Field {} is a {}, not a document", key, other.type_name());
                        Err(FolioError::new(
                            &format!("Cannot set embedded field, {} is a {} not a document", key, other.type_name()),
                            ErrorKind::InvalidArgument,
                        ))
                    }
                    None => Err(FolioError::new(
                        &format!("Field {} vanished while setting an embedded value", key),
                        ErrorKind::InternalError,
                    )),
                }
            }
        }
    }

    /// Removes a top-level field, returning its old value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Removes the value at an embedded field path, returning it.
    pub fn remove_path<S: AsRef<str>>(&mut self, path: &[S]) -> Option<Value> {
        match path {
            [] => None,
            [key] => self.data.remove(key.as_ref()),
            [first, rest @ ..] => match self.data.get_mut(first.as_ref()) {
                Some(Value::Document(embedded)) => embedded.remove_path(rest),
                _ => None,
            },
        }
    }

    /// Returns the identifier of this document if `_id` holds a [DocumentId].
    pub fn id(&self) -> Option<DocumentId> {
        self.data.get(DOC_ID).and_then(Value::as_id)
    }

    pub fn has_id(&self) -> bool {
        self.id().is_some()
    }

    /// Top-level field names in key order.
    pub fn fields(&self) -> FieldVec {
        self.data.keys().cloned().collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Copies every top-level field of `other` into this document,
    /// replacing existing values.
    pub fn merge(&mut self, other: &Document) -> FolioResult<()> {
        for (key, value) in other.iter() {
            self.put(key.as_str(), value.clone())?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.data
                .iter()
                .map(|(key, value)| format!("\"{}\": {}", key, value))
                .join(", ")
        )
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a Folio Document with JSON-like syntax.
///
/// Negative numbers and other multi-token expressions must be wrapped in
/// parentheses.
///
/// # Examples
///
/// ```rust
/// use folio::doc;
///
/// let empty = doc!{};
///
/// let book = doc!{
///     title: "1984",
///     author: "George Orwell",
///     published_year: 1949,
///     price: 12.0,
///     tags: ["dystopia", "classic"],
///     publisher: { name: "Secker & Warburg", country: "UK" },
///     rank: (-1)
/// };
/// assert_eq!(book.size(), 7);
/// ```
#[macro_export]
macro_rules! doc {
    // match an empty document (with braces)
    ({}) => {
        $crate::collection::Document::new()
    };

    // match an empty document
    () => {
        $crate::collection::Document::new()
    };

    // match a document with key value pairs (with outer braces)
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    // match a document with key value pairs
    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.put($crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the doc! macro.
/// Handles nested documents, arrays, and expressions.
#[macro_export]
macro_rules! doc_value {
    // match a nested document
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    // match an array of values
    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    // match an expression (variable, function call, arithmetic in parens, literals, etc.)
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
