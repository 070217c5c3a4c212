//! Logical failures reported by the backing service.

/// A failure the service reported about the request, including structured
/// error bodies delivered where binary media was expected.
///
/// # Examples
///
/// ```
/// use murmur_error::ServiceError;
///
/// let err = ServiceError::new(404, "Post not found");
/// assert_eq!(err.status, 404);
/// assert!(err.is_not_found());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Service Error: HTTP {} {} at line {} in {}", status, message, line, file)]
pub struct ServiceError {
    /// Status reported by the service
    pub status: u16,
    /// Message reported by the service
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ServiceError {
    /// Create a new service error at the current location.
    #[track_caller]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            status,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the service reported the target as missing.
    ///
    /// The post service answers a delete of an unknown post with 400 and a
    /// "not found" message rather than a 404, so both are recognised.
    pub fn is_not_found(&self) -> bool {
        self.status == 404 || self.message.to_ascii_lowercase().contains("not found")
    }
}
