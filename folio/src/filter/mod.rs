//! Query filters for selecting documents from collections.
//!
//! A [`Filter`] is a conjunction of `field <op> value` clauses drawn from a
//! fixed set of comparison operators. The empty filter ([`all`]) matches
//! every document.
//!
//! # Examples
//!
//! ```rust
//! use folio::doc;
//! use folio::filter::{all, field, Filter};
//!
//! // fluent API
//! let recent_in_stock = field("in_stock").eq(true).and(field("published_year").gt(2010));
//!
//! // filter document
//! let same = Filter::from_document(&doc! {
//!     in_stock: true,
//!     published_year: { "$gt": 2010 }
//! }).unwrap();
//!
//! assert_eq!(recent_in_stock, same);
//! assert!(all().is_all());
//! ```
//!
//! # Supported Operators
//!
//! - **Equality**: `eq` (`$eq` or a literal), `ne` (`$ne`)
//! - **Comparison**: `gt`, `gte`, `lt`, `lte` (`$gt`, `$gte`, `$lt`, `$lte`)

mod filter;
mod fluent;

pub use filter::*;
pub use fluent::*;
