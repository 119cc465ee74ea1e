/// Reserved field holding the document identifier.
pub const DOC_ID: &str = "_id";

/// Default separator between segments of an embedded field path.
pub const DEFAULT_FIELD_SEPARATOR: &str = ".";

/// Separator used when encoding a field tuple as a single name.
pub const NAME_SEPARATOR: &str = "|";
