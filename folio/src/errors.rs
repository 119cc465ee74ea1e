use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

/// Error kinds for Folio operations.
///
/// Every fallible operation reports exactly one of these kinds so callers can
/// branch on the failure category without parsing messages.
///
/// # Examples
///
/// ```rust
/// use folio::errors::{ErrorKind, FolioError, FolioResult};
///
/// fn example() -> FolioResult<()> {
///     Err(FolioError::new("Index not found", ErrorKind::NotFound))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::NotFound);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// Unknown document identifier, absent index or absent collection
    NotFound,
    /// A document with the same identifier already exists
    DuplicateKey,
    /// Malformed filter operator, negative skip/limit, mixed projection, etc.
    InvalidArgument,
    /// An accumulator or expression met a non-numeric value
    TypeMismatch,
    /// The provided identifier is outside the valid range
    InvalidId,
    /// An index already exists on the same field tuple
    IndexAlreadyExists,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::DuplicateKey => write!(f, "Duplicate key"),
            ErrorKind::InvalidArgument => write!(f, "Invalid argument"),
            ErrorKind::TypeMismatch => write!(f, "Type mismatch"),
            ErrorKind::InvalidId => write!(f, "Invalid ID"),
            ErrorKind::IndexAlreadyExists => write!(f, "Index already exists"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom Folio error type.
///
/// `FolioError` carries the error message, its kind, an optional cause and the
/// backtrace captured where it was created.
///
/// # Examples
///
/// ```rust
/// use folio::errors::{ErrorKind, FolioError};
///
/// let cause = FolioError::new("price is not numeric", ErrorKind::TypeMismatch);
/// let err = FolioError::new_with_cause("Group stage failed", ErrorKind::InvalidArgument, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct FolioError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<FolioError>>,
    backtrace: Backtrace,
}

impl FolioError {
    /// Creates a new `FolioError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        FolioError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Backtrace::new(),
        }
    }

    /// Creates a new `FolioError` wrapping a cause error.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: FolioError) -> Self {
        FolioError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Backtrace::new(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&FolioError> {
        self.cause.as_deref()
    }
}

impl Display for FolioError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for FolioError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for FolioError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for Folio operations.
pub type FolioResult<T> = Result<T, FolioError>;

impl From<String> for FolioError {
    fn from(msg: String) -> Self {
        FolioError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for FolioError {
    fn from(msg: &str) -> Self {
        FolioError::new(msg, ErrorKind::InternalError)
    }
}
