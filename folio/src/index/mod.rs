//! Equality indexes over single fields and ordered field tuples.
//!
//! An index maps the tuple of a document's values for the indexed fields to
//! the identifiers of the documents holding it. Indexes are created
//! explicitly on a collection, built from its current contents, and then
//! maintained inside the same write lock as every insert, update and
//! delete.

mod descriptor;
pub(crate) mod field_index;

pub use descriptor::*;
pub use field_index::IndexKey;
