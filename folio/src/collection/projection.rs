use crate::collection::Document;
use crate::common::{split_path, Value, DOC_ID};
use crate::errors::{ErrorKind, FolioError, FolioResult};

/// Selects which fields of a result document are returned.
///
/// A projection either includes a list of fields or excludes one; the two
/// cannot be combined, except that `_id` may always be excluded. In an
/// inclusion projection `_id` is returned unless it is explicitly excluded.
///
/// ```rust
/// use folio::collection::Projection;
/// use folio::doc;
///
/// let projection = Projection::include(vec!["title", "author"]).without_id();
/// let projected = projection.apply(&doc! { title: "1984", author: "George Orwell", price: 12.0 }, ".").unwrap();
/// assert_eq!(projected, doc! { title: "1984", author: "George Orwell" });
///
/// assert!(Projection::from_document(&doc! { title: 1, price: 0 }).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    mode: ProjectionMode,
    fields: Vec<String>,
    exclude_id: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProjectionMode {
    Include,
    Exclude,
}

impl Projection {
    /// Returns only the named fields (plus `_id`).
    pub fn include(fields: Vec<&str>) -> Projection {
        Projection {
            mode: ProjectionMode::Include,
            fields: fields.into_iter().map(str::to_string).collect(),
            exclude_id: false,
        }
    }

    /// Returns every field except the named ones.
    pub fn exclude(fields: Vec<&str>) -> Projection {
        Projection {
            mode: ProjectionMode::Exclude,
            fields: fields.into_iter().map(str::to_string).collect(),
            exclude_id: false,
        }
    }

    /// Drops `_id` from the projected documents.
    pub fn without_id(mut self) -> Projection {
        self.exclude_id = true;
        self
    }

    /// Parses a projection document such as `{title: 1, author: 1, _id: 0}`.
    ///
    /// Flags may be `1`/`0` or `true`/`false`. Fails with `InvalidArgument`
    /// on any other flag, on an empty document, or when inclusion and
    /// exclusion flags are mixed on fields other than `_id`.
    pub fn from_document(document: &Document) -> FolioResult<Projection> {
        if document.is_empty() {
            log::error!("Projection document cannot be empty");
            return Err(FolioError::new(
                "Projection document cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }

        let mut included = Vec::new();
        let mut excluded = Vec::new();
        let mut exclude_id = false;

        for (field_name, flag) in document.iter() {
            let include = Self::parse_flag(field_name, flag)?;
            if field_name == DOC_ID {
                exclude_id = !include;
            } else if include {
                included.push(field_name.clone());
            } else {
                excluded.push(field_name.clone());
            }
        }

        if !included.is_empty() && !excluded.is_empty() {
            log::error!(
                "Projection cannot mix inclusion {:?} and exclusion {:?}",
                included,
                excluded
            );
            return Err(FolioError::new(
                "Projection cannot mix inclusion and exclusion, except for _id",
                ErrorKind::InvalidArgument,
            ));
        }

        // `{_id: 1}` alone is an inclusion of the id only
        let id_only = included.is_empty() && excluded.is_empty() && !exclude_id;
        if !included.is_empty() || id_only {
            Ok(Projection {
                mode: ProjectionMode::Include,
                fields: included,
                exclude_id,
            })
        } else {
            Ok(Projection {
                mode: ProjectionMode::Exclude,
                fields: excluded,
                exclude_id,
            })
        }
    }

    fn parse_flag(field_name: &str, flag: &Value) -> FolioResult<bool> {
        match flag {
            Value::Bool(b) => Ok(*b),
            Value::I64(1) => Ok(true),
            Value::I64(0) => Ok(false),
            other => {
                log::error!("Invalid projection flag {} for field {}", other, field_name);
                Err(FolioError::new(
                    &format!("Invalid projection flag {} for field {}, expected 0 or 1", other, field_name),
                    ErrorKind::InvalidArgument,
                ))
            }
        }
    }

    pub fn is_inclusion(&self) -> bool {
        self.mode == ProjectionMode::Include
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Produces the projected copy of `document`. Dotted field names select
    /// embedded fields.
    pub fn apply(&self, document: &Document, separator: &str) -> FolioResult<Document> {
        match self.mode {
            ProjectionMode::Include => {
                let mut projected = Document::new();
                if !self.exclude_id {
                    if let Some(id) = document.get(DOC_ID) {
                        projected.put(DOC_ID, id.clone())?;
                    }
                }
                for field_name in &self.fields {
                    let path = split_path(field_name, separator);
                    if let Some(value) = document.get_path(&path) {
                        projected.put_path(&path, value.clone())?;
                    }
                }
                Ok(projected)
            }
            ProjectionMode::Exclude => {
                let mut projected = document.clone();
                if self.exclude_id {
                    projected.remove(DOC_ID);
                }
                for field_name in &self.fields {
                    projected.remove_path(&split_path(field_name, separator));
                }
                Ok(projected)
            }
        }
    }
}
