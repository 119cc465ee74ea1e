use std::fmt::Display;
use std::sync::Arc;

use crate::common::Fields;

/// Describes an equality index: the ordered field tuple it covers and the
/// collection it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexDescriptor {
    inner: Arc<IndexDescriptorInner>,
}

impl IndexDescriptor {
    pub fn new(index_fields: Fields, collection_name: &str) -> Self {
        Self {
            inner: Arc::new(IndexDescriptorInner {
                index_fields,
                collection_name: collection_name.to_string(),
            }),
        }
    }

    pub fn index_fields(&self) -> &Fields {
        &self.inner.index_fields
    }

    pub fn collection_name(&self) -> &str {
        &self.inner.collection_name
    }

    pub fn is_compound_index(&self) -> bool {
        self.inner.index_fields.len() > 1
    }
}

impl Display for IndexDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.inner.collection_name, self.inner.index_fields)
    }
}

#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct IndexDescriptorInner {
    index_fields: Fields,
    collection_name: String,
}
