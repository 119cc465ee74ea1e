//! # Folio - In-Memory Document Query Engine
//!
//! Folio stores schemaless documents in named collections and answers
//! queries over them: conjunctive filters, projection, multi-key sorting,
//! pagination, aggregation pipelines and equality indexes.
//!
//! ## Key Features
//!
//! - **Documents**: ordered maps of tagged values, with dotted paths into embedded documents
//! - **Filters**: `eq`, `ne`, `gt`, `gte`, `lt`, `lte`, built fluently or parsed from a document
//! - **Queries**: projection, stable multi-key sort with optional collation, skip and limit
//! - **Aggregation**: match, group (sum, avg, count), sort, skip, limit and project stages
//! - **Indexes**: single-field and compound equality indexes, used by the query planner
//! - **Explain**: every query reports its scan strategy and examined/returned counts
//!
//! ## Quick Start
//!
//! ```rust
//! use folio::aggregate::{Expression, Group, Stage};
//! use folio::filter::field;
//! use folio::{doc, Folio};
//!
//! let db = Folio::builder().open().unwrap();
//! let books = db.collection("books").unwrap();
//!
//! books.insert(doc! { title: "1984", genre: "Fiction", price: 12.0 }).unwrap();
//! books.insert(doc! { title: "Brave New World", genre: "Fiction", price: 10.0 }).unwrap();
//!
//! books.create_index(vec!["title"]).unwrap();
//! let plan = books.explain(field("title").eq("1984")).unwrap();
//! assert!(plan.is_index_scan());
//!
//! let by_genre = books
//!     .aggregate(vec![Stage::from(
//!         Group::by(Expression::field("genre")).avg("averagePrice", Expression::field("price")),
//!     )])
//!     .unwrap();
//! assert_eq!(by_genre.documents(), &[doc! { _id: "Fiction", averagePrice: 11.0 }]);
//! ```
//!
//! ## Concurrency
//!
//! A collection is the unit of mutual exclusion. Queries and aggregations on
//! a collection run concurrently with each other; inserts, updates, deletes
//! and index changes take the collection exclusively and update its indexes
//! in the same critical section.
//!
//! ## Module Organization
//!
//! - [`aggregate`] - Aggregation stages, expressions and accumulators
//! - [`collection`] - Collections, documents, find options and plans
//! - [`common`] - Values, field tuples and sort orders
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Query filters
//! - [`index`] - Index descriptors and keys

pub mod aggregate;
pub mod collection;
pub mod common;
pub mod errors;
pub mod filter;
pub mod folio;
pub mod folio_builder;
pub mod folio_config;
pub mod index;
pub(crate) mod store;

pub use crate::folio::Folio;
pub use crate::folio_builder::FolioBuilder;
pub use crate::folio_config::FolioConfig;
