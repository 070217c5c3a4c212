//! Network-level failures.

/// Why a request failed to produce a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum NetworkErrorKind {
    /// The request-scoped deadline elapsed
    #[display("timeout")]
    Timeout,
    /// The connection could not be established or was dropped
    #[display("connectivity failure")]
    ConnectivityFailure,
}

/// Network error with source location.
///
/// # Examples
///
/// ```
/// use murmur_error::{NetworkError, NetworkErrorKind};
///
/// let err = NetworkError::new(NetworkErrorKind::Timeout, "no response after 30000ms");
/// assert_eq!(err.kind, NetworkErrorKind::Timeout);
/// assert!(format!("{}", err).contains("timeout"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Network Error ({}): {} at line {} in {}", kind, message, line, file)]
pub struct NetworkError {
    /// Failure classification
    pub kind: NetworkErrorKind,
    /// Detail from the underlying client
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl NetworkError {
    /// Create a new network error at the current location.
    #[track_caller]
    pub fn new(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a timeout.
    #[track_caller]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(NetworkErrorKind::Timeout, message)
    }

    /// Shorthand for a connectivity failure.
    #[track_caller]
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::new(NetworkErrorKind::ConnectivityFailure, message)
    }
}
