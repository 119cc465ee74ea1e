use crate::collection::Collection;
use crate::errors::{ErrorKind, FolioError, FolioResult};
use crate::folio_builder::FolioBuilder;
use crate::folio_config::FolioConfig;
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::Arc;

/// An in-memory database: a registry of named collections sharing one
/// [FolioConfig].
///
/// `Folio` is a cheap, thread-safe handle. Clones share the same
/// collections.
///
/// # Examples
///
/// ```rust
/// use folio::filter::field;
/// use folio::{doc, Folio};
///
/// let db = Folio::builder().open().unwrap();
/// let books = db.collection("books").unwrap();
/// books.insert(doc! { title: "1984", author: "George Orwell" }).unwrap();
///
/// let cursor = books.find(field("author").eq("George Orwell")).unwrap();
/// assert_eq!(cursor.size(), 1);
/// assert!(db.has_collection("books"));
/// ```
#[derive(Clone)]
pub struct Folio {
    inner: Arc<FolioInner>,
}

struct FolioInner {
    config: FolioConfig,
    collections: DashMap<String, Collection>,
}

impl Folio {
    /// Creates a builder for configuring a new instance.
    pub fn builder() -> FolioBuilder {
        FolioBuilder::new()
    }

    pub(crate) fn new(config: FolioConfig) -> Self {
        Folio {
            inner: Arc::new(FolioInner {
                config,
                collections: DashMap::new(),
            }),
        }
    }

    pub fn config(&self) -> &FolioConfig {
        &self.inner.config
    }

    /// Returns the collection called `name`, creating an empty one on first
    /// use.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the name is empty or contains whitespace.
    pub fn collection(&self, name: &str) -> FolioResult<Collection> {
        validate_collection_name(name)?;
        let collection = self
            .inner
            .collections
            .entry(name.to_string())
            .or_insert_with(|| {
                log::info!("Created collection {}", name);
                Collection::new(name, self.inner.config.clone())
            })
            .clone();
        Ok(collection)
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.inner.collections.contains_key(name)
    }

    /// Names of all collections, in lexical order.
    pub fn list_collection_names(&self) -> BTreeSet<String> {
        self.inner
            .collections
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Removes a collection with its documents and indexes. Handles obtained
    /// earlier fail with `NotFound` afterwards.
    pub fn drop_collection(&self, name: &str) -> FolioResult<()> {
        match self.inner.collections.remove(name) {
            Some((_, collection)) => {
                collection.drop_contents();
                Ok(())
            }
            None => {
                log::error!("No collection named {} to drop", name);
                Err(FolioError::new(
                    &format!("No collection named {} to drop", name),
                    ErrorKind::NotFound,
                ))
            }
        }
    }
}

fn validate_collection_name(name: &str) -> FolioResult<()> {
    if name.is_empty() {
        log::error!("Collection name cannot be empty");
        return Err(FolioError::new(
            "Collection name cannot be empty",
            ErrorKind::InvalidArgument,
        ));
    }

    if name.chars().any(char::is_whitespace) {
        log::error!("Collection name '{}' cannot contain whitespace", name);
        return Err(FolioError::new(
            &format!("Collection name '{}' cannot contain whitespace", name),
            ErrorKind::InvalidArgument,
        ));
    }
    Ok(())
}
