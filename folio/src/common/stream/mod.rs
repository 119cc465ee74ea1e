mod document_cursor;
pub(crate) mod sorted_stream;

pub use document_cursor::*;
