//! Top-level error wrapper types.

use crate::{
    AuthError, ConfigError, DecodeError, MediaError, MediaErrorKind, NetworkError,
    NetworkErrorKind, ServiceError, ValidationError,
};

/// Every failure the media access layer can surface.
///
/// # Examples
///
/// ```
/// use murmur_error::{MurmurError, NetworkError};
///
/// let err: MurmurError = NetworkError::connectivity("connection reset").into();
/// assert!(format!("{}", err).contains("Network Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MurmurErrorKind {
    /// The request produced no response
    #[from(NetworkError)]
    Network(NetworkError),
    /// The service reported a logical failure
    #[from(ServiceError)]
    Service(ServiceError),
    /// The credential was rejected
    #[from(AuthError)]
    Auth(AuthError),
    /// A caller precondition failed
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Response body could not be decoded
    #[from(DecodeError)]
    Decode(DecodeError),
    /// Media lifecycle error
    #[from(MediaError)]
    Media(MediaError),
}

/// Murmur error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Murmur Error: {}", _0)]
pub struct MurmurError(Box<MurmurErrorKind>);

impl MurmurError {
    /// Create a new error from a kind.
    pub fn new(kind: MurmurErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MurmurErrorKind {
        &self.0
    }

    /// True when the credential was rejected and the session was invalidated.
    pub fn is_auth(&self) -> bool {
        matches!(self.kind(), MurmurErrorKind::Auth(_))
    }

    /// True when the failure happened before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), MurmurErrorKind::Validation(_))
    }

    /// The service error, if this is one.
    pub fn as_service(&self) -> Option<&ServiceError> {
        match self.kind() {
            MurmurErrorKind::Service(e) => Some(e),
            _ => None,
        }
    }

    /// The network failure classification, if this is a network error.
    pub fn network_kind(&self) -> Option<NetworkErrorKind> {
        match self.kind() {
            MurmurErrorKind::Network(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Message suitable for showing to the person who triggered the action.
    ///
    /// # Examples
    ///
    /// ```
    /// use murmur_error::{AuthError, MurmurError};
    ///
    /// let err = MurmurError::from(AuthError::new(401));
    /// assert!(err.user_message().contains("sign in"));
    /// ```
    pub fn user_message(&self) -> String {
        match self.kind() {
            MurmurErrorKind::Network(e) => match e.kind {
                NetworkErrorKind::Timeout => {
                    "The server took too long to respond. Please try again.".to_string()
                }
                NetworkErrorKind::ConnectivityFailure => {
                    "Could not reach the server. Check your connection and try again.".to_string()
                }
            },
            MurmurErrorKind::Service(e) if e.message.is_empty() => {
                format!("The request failed (HTTP {}). Please try again.", e.status)
            }
            MurmurErrorKind::Service(e) => format!("The request failed: {}", e.message),
            MurmurErrorKind::Auth(_) => "Your session has expired. Please sign in again.".to_string(),
            MurmurErrorKind::Validation(e) => e.message.clone(),
            MurmurErrorKind::Media(e) if matches!(e.kind, MediaErrorKind::FileWrite(_)) => {
                "The media could not be saved. Check the output path and try again.".to_string()
            }
            MurmurErrorKind::Config(_) | MurmurErrorKind::Decode(_) | MurmurErrorKind::Media(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

// Generic From implementation for any type that converts to MurmurErrorKind
impl<T> From<T> for MurmurError
where
    T: Into<MurmurErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Murmur operations.
pub type MurmurResult<T> = std::result::Result<T, MurmurError>;
