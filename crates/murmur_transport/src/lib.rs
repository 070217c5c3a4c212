//! Credential provider and transport client for the Murmur media access layer.
//!
//! Every call to the backing service goes through one [`TransportClient`]. It
//! attaches the session credential, fixes the base endpoint and deadline,
//! separates binary media from structured error bodies, and retries
//! connectivity failures a bounded number of times.
//!
//! # Example
//!
//! ```rust,no_run
//! use murmur_core::{MurmurConfig, Session};
//! use murmur_transport::{CredentialProvider, MemorySessionStore, TransportClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MurmurConfig::load()?;
//! let store = Arc::new(MemorySessionStore::with_session(&Session::new("3", "Ada", "t0k")));
//! let credentials = CredentialProvider::new(store, *config.transport().credential_scheme());
//! let client = TransportClient::new(config.transport().clone(), credentials)?;
//!
//! let posts: serde_json::Value = client.get_json("/api/posts").await?;
//! println!("{}", posts);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod client;
mod response;
mod retry;
mod session;

pub use backend::{FormPart, HttpBackend, OutboundRequest, RawResponse, RequestBody, ReqwestBackend};
pub use client::{RequestOptions, TransportClient};
pub use reqwest::Method;
pub use response::{Response, ResponseMode};
pub use retry::RetryState;
pub use session::{CredentialProvider, MemorySessionStore, SessionEvent, SessionStore};
