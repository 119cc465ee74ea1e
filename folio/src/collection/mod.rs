//! Collections, documents and the read/write paths over them.
//!
//! A [`Document`] is an ordered map of field names to [`Value`](crate::common::Value)s.
//! Embedded fields are addressed with dotted paths (the separator is
//! configurable through [`FolioBuilder`](crate::FolioBuilder)).
//!
//! A [`Collection`] stores documents under unique [`DocumentId`]s, keeps
//! them in insertion order, and maintains the secondary indexes created on
//! it.
//!
//! ```rust
//! use folio::collection::{FindOptions, Projection};
//! use folio::filter::field;
//! use folio::{doc, Folio};
//!
//! let db = Folio::builder().open().unwrap();
//! let books = db.collection("books").unwrap();
//! books.insert(doc! { title: "1984", author: "George Orwell", price: 12.0 }).unwrap();
//!
//! let options = FindOptions::new().projection(Projection::include(vec!["title"]).without_id());
//! let titles = books.find_with_options(field("price").gt(10), &options).unwrap().into_vec();
//! assert_eq!(titles, vec![doc! { title: "1984" }]);
//! ```
//!
//! # Document IDs
//!
//! Every stored document has a `_id` field holding a [`DocumentId`]. The id
//! is generated with a snowflake scheme when the document has none.

mod collection;
mod document;
mod document_id;
mod find_options;
mod find_plan;
pub(crate) mod operation;
mod projection;
pub(crate) mod snowflake;

pub use collection::*;
pub use document::*;
pub use document_id::*;
pub use find_options::*;
pub use find_plan::*;
pub use operation::WriteResult;
pub use projection::*;
