//! Credential rejection.

/// The service rejected the attached credential (401/403).
///
/// Raising this error is always paired with invalidating the local session.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Auth Error: credential rejected with HTTP {} at line {} in {}", status, line, file)]
pub struct AuthError {
    /// Status that signalled the rejection
    pub status: u16,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl AuthError {
    /// Create a new auth error at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use murmur_error::AuthError;
    ///
    /// let err = AuthError::new(403);
    /// assert_eq!(err.status, 403);
    /// ```
    #[track_caller]
    pub fn new(status: u16) -> Self {
        let location = std::panic::Location::caller();
        Self {
            status,
            line: location.line(),
            file: location.file(),
        }
    }
}
