use backtrace::Backtrace;
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for Badger operations
///
/// Each kind names one category of failure so callers can branch on it
/// without parsing messages.
///
/// # Examples
///
/// ```rust
/// use badger::errors::{BadgerError, ErrorKind, BadgerResult};
///
/// fn example() -> BadgerResult<()> {
///     Err(BadgerError::new("couldn't resolve field bogus", ErrorKind::SchemaError))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::SchemaError);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// Malformed query text, such as an unterminated quoted literal
    LexError,
    /// Query text that does not fit the grammar or names an unknown field
    ParseError,
    /// Field missing from or unsupported by a document schema, or an invalid schema
    SchemaError,
    /// A document of the wrong concrete type was handed to a collection
    TypeMismatch,
    /// The requested document does not exist
    NotFound,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::LexError => write!(f, "Lex error"),
            ErrorKind::ParseError => write!(f, "Parse error"),
            ErrorKind::SchemaError => write!(f, "Schema error"),
            ErrorKind::TypeMismatch => write!(f, "Type mismatch"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom Badger error type.
///
/// `BadgerError` carries a message, an [`ErrorKind`], an optional cause and the
/// backtrace captured where the error was created. The backtrace is resolved
/// lazily, only when the error is debug-printed.
///
/// # Examples
///
/// ```rust
/// use badger::errors::{BadgerError, ErrorKind};
///
/// let cause = BadgerError::new("unterminated quoted literal", ErrorKind::LexError);
/// let err = BadgerError::new_with_cause("failed to parse query", ErrorKind::ParseError, cause);
/// assert_eq!(err.cause().unwrap().kind(), &ErrorKind::LexError);
/// ```
#[derive(Clone)]
pub struct BadgerError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<BadgerError>>,
    backtrace: Arc<Mutex<Backtrace>>,
}

impl BadgerError {
    /// Creates a new `BadgerError` with the specified message and error kind.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        BadgerError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Mutex::new(Backtrace::new_unresolved())),
        }
    }

    /// Creates a new `BadgerError` wrapping an underlying cause.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error
    /// * `error_kind` - The category of error
    /// * `cause` - The underlying error that caused this error
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: BadgerError) -> Self {
        BadgerError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Mutex::new(Backtrace::new_unresolved())),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&BadgerError> {
        self.cause.as_deref()
    }
}

impl Display for BadgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for BadgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {}\nCaused by: {:?}", self.error_kind, self.message, cause),
            None => {
                let mut backtrace = self.backtrace.lock();
                backtrace.resolve();
                write!(f, "{}: {}\n{:?}", self.error_kind, self.message, backtrace)
            }
        }
    }
}

impl Error for BadgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for Badger operations.
///
/// `BadgerResult<T>` is shorthand for `Result<T, BadgerError>`.
pub type BadgerResult<T> = Result<T, BadgerError>;

impl From<std::num::ParseIntError> for BadgerError {
    fn from(err: std::num::ParseIntError) -> Self {
        BadgerError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::ParseError,
        )
    }
}
