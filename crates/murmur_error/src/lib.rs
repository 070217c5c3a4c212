//! Error types for the Murmur media access layer.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enums name the specific condition
//! - `*Error` structs wrap the condition with source location tracking
//! - constructors use `#[track_caller]` so the location is captured automatically
//!
//! The taxonomy mirrors how failures propagate through the client:
//!
//! | Error | Raised when | Retried |
//! |---|---|---|
//! | [`NetworkError`] (`ConnectivityFailure`) | the request never produced a response | yes, up to the configured bound |
//! | [`NetworkError`] (`Timeout`) | the request deadline elapsed | no |
//! | [`ServiceError`] | the service answered with a logical failure | no |
//! | [`AuthError`] | the credential was rejected | no, the session is invalidated instead |
//! | [`ValidationError`] | a caller precondition failed before any I/O | no |
//!
//! # Examples
//!
//! ```
//! use murmur_error::{MurmurResult, ValidationError};
//!
//! fn check(content: &str) -> MurmurResult<()> {
//!     if content.trim().is_empty() {
//!         Err(ValidationError::new("post content is empty"))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check("").is_err());
//! assert!(check("hello").is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod config;
mod decode;
mod error;
mod media;
mod network;
mod retry;
mod service;
mod validation;

pub use auth::AuthError;
pub use config::ConfigError;
pub use decode::DecodeError;
pub use error::{MurmurError, MurmurErrorKind, MurmurResult};
pub use media::{MediaError, MediaErrorKind};
pub use network::{NetworkError, NetworkErrorKind};
pub use retry::RetryableError;
pub use service::ServiceError;
pub use validation::ValidationError;
