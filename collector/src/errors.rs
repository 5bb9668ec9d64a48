use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for collector operations
///
/// Each kind names one category of failure so callers can tell a missing record
/// apart from a broken connection or a malformed query.
///
/// # Examples
///
/// ```rust,ignore
/// use collector::errors::{CollectorError, ErrorKind, CollectorResult};
///
/// fn example() -> CollectorResult<()> {
///     Err(CollectorError::new("No record in the result", ErrorKind::NotFound))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Configuration Errors - raised while building a collection binding
    /// Invalid store type, missing credential or empty endpoint component
    ConfigurationError,

    // Remote Errors - raised by the transport
    /// The remote store answered with a non-success status code
    RemoteError(u16),
    /// The request never produced a response (network, I/O, timeout)
    TransportError,

    // Result Errors
    /// The query result holds no record
    NotFound,

    // Model Errors
    /// Attempt to reassign or remove `_key` / `_ts`
    ImmutableField,
    /// The name is not a declared field of the model
    FieldNotFound,
    /// The model has no `_key` and cannot be addressed remotely
    NotIdentifiable,
    /// A value has the wrong type for its slot
    InvalidDataType,

    // Query Errors
    /// A query parameter failed validation (e.g. a non-integer prefix count)
    InvalidQueryParameter,

    // Encoding Errors
    /// Error encoding or decoding a JSON line
    EncodingError,

    // Generic/Internal Errors - used as fallback
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ConfigurationError => write!(f, "Configuration error"),
            ErrorKind::RemoteError(status) => write!(f, "Remote error (status {})", status),
            ErrorKind::TransportError => write!(f, "Transport error"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::ImmutableField => write!(f, "Immutable field"),
            ErrorKind::FieldNotFound => write!(f, "Field not found"),
            ErrorKind::NotIdentifiable => write!(f, "Not identifiable"),
            ErrorKind::InvalidDataType => write!(f, "Invalid data type"),
            ErrorKind::InvalidQueryParameter => write!(f, "Invalid query parameter"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom collector error type.
///
/// `CollectorError` carries a message, a kind and an optional cause. A backtrace
/// is captured when the error is created and printed by the `Debug` impl.
///
/// # Examples
///
/// ```rust,ignore
/// use collector::errors::{CollectorError, ErrorKind};
///
/// let err = CollectorError::new("Missing API key", ErrorKind::ConfigurationError);
///
/// let cause = CollectorError::new("connection refused", ErrorKind::TransportError);
/// let err = CollectorError::new_with_cause("Unable to save model", ErrorKind::TransportError, cause);
/// ```
#[derive(Clone)]
pub struct CollectorError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<CollectorError>>,
    backtrace: Arc<Backtrace>,
}

impl CollectorError {
    /// Creates a new `CollectorError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        CollectorError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `CollectorError` that wraps an underlying cause.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: CollectorError) -> Self {
        CollectorError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&CollectorError> {
        self.cause.as_deref()
    }
}

impl Display for CollectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for CollectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{} ({})\nCaused by: {:?}", self.message, self.error_kind, cause),
            None => write!(f, "{} ({})\n{:?}", self.message, self.error_kind, self.backtrace),
        }
    }
}

impl Error for CollectorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for collector operations.
pub type CollectorResult<T> = Result<T, CollectorError>;

impl From<std::io::Error> for CollectorError {
    fn from(err: std::io::Error) -> Self {
        CollectorError::new(&format!("IO error: {}", err), ErrorKind::TransportError)
    }
}

impl From<serde_json::Error> for CollectorError {
    fn from(err: serde_json::Error) -> Self {
        CollectorError::new(&format!("JSON error: {}", err), ErrorKind::EncodingError)
    }
}

impl From<std::num::ParseIntError> for CollectorError {
    fn from(err: std::num::ParseIntError) -> Self {
        CollectorError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::InvalidDataType,
        )
    }
}

impl From<String> for CollectorError {
    fn from(msg: String) -> Self {
        CollectorError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for CollectorError {
    fn from(msg: &str) -> Self {
        CollectorError::new(msg, ErrorKind::InternalError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_error_new_creates_error() {
        let error = CollectorError::new("An error occurred", ErrorKind::NotFound);
        assert_eq!(error.message, "An error occurred");
        assert_eq!(error.error_kind, ErrorKind::NotFound);
        assert!(error.cause.is_none());
    }

    #[test]
    fn collector_error_new_with_cause_creates_error() {
        let cause = CollectorError::new("connection refused", ErrorKind::TransportError);
        let error = CollectorError::new_with_cause("Unable to save", ErrorKind::TransportError, cause);
        assert_eq!(error.message(), "Unable to save");
        assert_eq!(error.cause().map(|c| c.message()), Some("connection refused"));
        assert!(error.source().is_some());
    }

    #[test]
    fn collector_error_display_is_message() {
        let error = CollectorError::new("Missing API key", ErrorKind::ConfigurationError);
        assert_eq!(format!("{}", error), "Missing API key");
    }

    #[test]
    fn collector_error_debug_includes_kind() {
        let error = CollectorError::new("boom", ErrorKind::RemoteError(503));
        let debug = format!("{:?}", error);
        assert!(debug.contains("boom"));
        assert!(debug.contains("status 503"));
    }

    #[test]
    fn from_parse_int_error_maps_to_invalid_data_type() {
        let err: CollectorError = "abc".parse::<i64>().unwrap_err().into();
        assert_eq!(err.kind(), &ErrorKind::InvalidDataType);
    }

    #[test]
    fn from_serde_json_error_maps_to_encoding_error() {
        let err: CollectorError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), &ErrorKind::EncodingError);
    }

    #[test]
    fn from_str_maps_to_internal_error() {
        let err: CollectorError = "oops".into();
        assert_eq!(err.kind(), &ErrorKind::InternalError);
    }

    #[test]
    fn remote_error_kinds_compare_by_status() {
        assert_eq!(ErrorKind::RemoteError(404), ErrorKind::RemoteError(404));
        assert_ne!(ErrorKind::RemoteError(404), ErrorKind::RemoteError(500));
    }
}
