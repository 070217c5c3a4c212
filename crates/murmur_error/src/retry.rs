//! Retry eligibility.

use crate::{MurmurError, MurmurErrorKind, NetworkError, NetworkErrorKind};

/// Errors that can say whether repeating the request may succeed.
///
/// Only connectivity failures are transient. Timeouts, service errors,
/// credential rejection and validation failures surface immediately.
///
/// # Examples
///
/// ```
/// use murmur_error::{NetworkError, RetryableError, ServiceError, MurmurError};
///
/// assert!(NetworkError::connectivity("connection refused").is_retryable());
/// assert!(!NetworkError::timeout("deadline elapsed").is_retryable());
/// assert!(!MurmurError::from(ServiceError::new(503, "busy")).is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger another attempt.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for NetworkError {
    fn is_retryable(&self) -> bool {
        self.kind == NetworkErrorKind::ConnectivityFailure
    }
}

impl RetryableError for MurmurError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            MurmurErrorKind::Network(e) => e.is_retryable(),
            _ => false,
        }
    }
}
