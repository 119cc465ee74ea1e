//! Aggregation pipelines.
//!
//! A pipeline is an ordered list of [`Stage`]s run against one collection
//! with [`crate::collection::Collection::aggregate`]. Stages see the full
//! output of the stage before them.
//!
//! ```rust
//! use folio::aggregate::{Expression, Group, Stage};
//! use folio::common::SortOrder;
//! use folio::{doc, Folio};
//!
//! let db = Folio::builder().open().unwrap();
//! let books = db.collection("books").unwrap();
//! books.insert(doc! { author: "George Orwell", title: "1984" }).unwrap();
//! books.insert(doc! { author: "George Orwell", title: "Animal Farm" }).unwrap();
//! books.insert(doc! { author: "Aldous Huxley", title: "Brave New World" }).unwrap();
//!
//! let result = books
//!     .aggregate(vec![
//!         Stage::from(Group::by(Expression::field("author")).sum("count", Expression::literal(1))),
//!         Stage::sort_by("count", SortOrder::Descending),
//!         Stage::Limit(1),
//!     ])
//!     .unwrap();
//! assert_eq!(result.documents(), &[doc! { _id: "George Orwell", count: 2 }]);
//! ```

mod accumulator;
mod expression;
mod group;
mod pipeline;
mod stage;

pub use accumulator::{avg, count, sum, Accumulator};
pub use expression::*;
pub use group::*;
pub use pipeline::AggregateResult;
pub(crate) use pipeline::AggregationPipeline;
pub use stage::*;
