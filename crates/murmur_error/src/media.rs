//! Media lifecycle errors.

/// Media lifecycle failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MediaErrorKind {
    /// The owning view was torn down before the handle could be recorded
    #[display("view torn down before media {} was acquired", _0)]
    TornDown(String),
    /// The reference carries nothing a handle could be built from
    #[display("unusable media reference: {:?}", _0)]
    UnusableReference(String),
    /// Resolved media could not be written to disk
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
}

/// Media error with location tracking.
///
/// # Examples
///
/// ```
/// use murmur_error::{MediaError, MediaErrorKind};
///
/// let err = MediaError::new(MediaErrorKind::TornDown("42".to_string()));
/// assert!(format!("{}", err).contains("torn down"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Media Error: {} at line {} in {}", kind, line, file)]
pub struct MediaError {
    /// The kind of error that occurred
    pub kind: MediaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MediaError {
    /// Create a new media error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MediaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
