use crate::errors::{ErrorKind, FolioError, FolioResult};
use std::fmt::{Debug, Display};

const MAX_VALUE: u64 = 10_000_000_000_000_000_000;
const MIN_VALUE: u64 = 1_000_000_000_000_000_000;

/// A unique identifier for documents in a collection.
///
/// Identifiers are 64-bit snowflake values in the range [10^18, 10^19),
/// produced by the [`IdGenerator`](crate::collection::IdGenerator) owned by
/// the database configuration. Once assigned at insertion, a document's
/// identifier never changes.
///
/// # Examples
///
/// ```rust
/// use folio::collection::DocumentId;
///
/// let id = DocumentId::create_id(1_000_000_000_000_000_001).unwrap();
/// assert_eq!(id.id_value(), 1_000_000_000_000_000_001);
/// assert!(DocumentId::create_id(42).is_err());
/// ```
#[derive(PartialEq, Eq, Ord, PartialOrd, Hash, Clone, Copy)]
pub struct DocumentId {
    id_value: u64,
}

impl DocumentId {
    /// Creates a `DocumentId` from a specific value.
    ///
    /// The value must be within the valid range [10^18, 10^19).
    pub fn create_id(id_value: u64) -> FolioResult<DocumentId> {
        DocumentId::validate(id_value)?;
        Ok(DocumentId { id_value })
    }

    pub(crate) fn from_generated(id_value: u64) -> DocumentId {
        DocumentId { id_value }
    }

    /// Gets the numeric value of this ID.
    pub fn id_value(&self) -> u64 {
        self.id_value
    }

    fn validate(id_value: u64) -> FolioResult<()> {
        if id_value >= MAX_VALUE {
            log::error!("Id value {} is too large", id_value);
            return Err(FolioError::new(
                &format!("Id value must be less than 10^19, got {}", id_value),
                ErrorKind::InvalidId,
            ));
        } else if id_value < MIN_VALUE {
            log::error!("Id value {} is too small", id_value);
            return Err(FolioError::new(
                &format!("Id value must be greater than or equal to 10^18, got {}", id_value),
                ErrorKind::InvalidId,
            ));
        }
        Ok(())
    }
}

impl Debug for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentId({})", self.id_value)
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_id() {
        let id = DocumentId::create_id(1324567890123456789);
        assert!(id.is_ok());
        assert_eq!(id.unwrap().id_value(), 1324567890123456789);
    }

    #[test]
    fn test_create_id_too_small() {
        let id = DocumentId::create_id(123);
        assert_eq!(id.unwrap_err().kind(), &ErrorKind::InvalidId);

        let id = DocumentId::create_id(0);
        assert!(id.is_err());
    }

    #[test]
    fn test_create_id_too_large() {
        let id = DocumentId::create_id(u64::MAX);
        assert_eq!(id.unwrap_err().kind(), &ErrorKind::InvalidId);
    }

    #[test]
    fn test_display_and_ordering() {
        let a = DocumentId::create_id(MIN_VALUE).unwrap();
        let b = DocumentId::create_id(MIN_VALUE + 1).unwrap();
        assert!(a < b);
        assert_eq!(a.to_string(), "1000000000000000000");
        assert_eq!(format!("{:?}", a), "DocumentId(1000000000000000000)");
    }
}
