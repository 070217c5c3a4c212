//! Core data types for the Murmur media access layer.
//!
//! This crate provides the types shared by the transport, media and post crates:
//! the session record and the credential derived from it, server-declared media
//! references, posts as the service returns them, upload payloads, and the
//! layered client configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod media;
mod post;
mod serde_helpers;
mod session;
mod upload;

pub use config::{MediaConfig, MediaStrategy, MurmurConfig, TransportConfig};
pub use media::{MEDIA_PATH_PREFIX, MediaId, MediaKind, MediaReference};
pub use post::{Comment, Post};
pub use session::{Credential, CredentialScheme, Session};
pub use upload::{UploadFile, content_type_for_filename};
