use crate::collection::snowflake::IdGenerator;
use crate::collection::DocumentId;
use crate::common::DEFAULT_FIELD_SEPARATOR;
use crate::errors::{ErrorKind, FolioError, FolioResult};
use std::sync::Arc;

/// Settings shared by every collection of a [Folio](crate::Folio) instance.
///
/// Cloning is cheap; all clones share the same id generator, so ids stay
/// unique across collections.
#[derive(Clone)]
pub struct FolioConfig {
    inner: Arc<FolioConfigInner>,
}

struct FolioConfigInner {
    field_separator: String,
    id_generator: IdGenerator,
}

impl Default for FolioConfig {
    fn default() -> Self {
        FolioConfig {
            inner: Arc::new(FolioConfigInner {
                field_separator: DEFAULT_FIELD_SEPARATOR.to_string(),
                id_generator: IdGenerator::new(),
            }),
        }
    }
}

impl FolioConfig {
    /// Creates a config whose embedded field paths are split on
    /// `field_separator`.
    pub fn new(field_separator: &str) -> FolioResult<Self> {
        Self::validate_field_separator(field_separator)?;
        Ok(FolioConfig {
            inner: Arc::new(FolioConfigInner {
                field_separator: field_separator.to_string(),
                id_generator: IdGenerator::new(),
            }),
        })
    }

    pub(crate) fn validate_field_separator(field_separator: &str) -> FolioResult<()> {
        if field_separator.is_empty() {
            log::error!("Field separator cannot be empty");
            return Err(FolioError::new(
                "Field separator cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }
        Ok(())
    }

    pub fn field_separator(&self) -> &str {
        &self.inner.field_separator
    }

    pub(crate) fn next_id(&self) -> DocumentId {
        self.inner.id_generator.next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_separator() {
        assert_eq!(FolioConfig::default().field_separator(), ".");
    }

    #[test]
    fn test_custom_separator() {
        let config = FolioConfig::new(":").unwrap();
        assert_eq!(config.field_separator(), ":");
    }

    #[test]
    fn test_empty_separator_is_invalid() {
        let err = FolioConfig::new("").err().unwrap();
        assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_clones_share_id_generator() {
        let config = FolioConfig::default();
        let clone = config.clone();
        let a = config.next_id();
        let b = clone.next_id();
        assert_ne!(a, b);
        assert!(b > a);
    }
}
