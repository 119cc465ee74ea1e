mod document_store;

pub(crate) use document_store::*;
