//! Common types shared by every part of the engine: values, field tuples,
//! sort specifications and constants.

mod constants;
mod fields;
mod sort_order;
pub(crate) mod stream;
pub(crate) mod util;
mod value;

pub use constants::*;
pub use fields::*;
pub use sort_order::*;
pub use stream::DocumentCursor;
pub use value::*;
