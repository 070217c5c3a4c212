//! Murmur - authenticated media access for a social feed client.
//!
//! Murmur fetches protected images and video with the signed-in user's
//! credential, turns them into locally addressable handles, retries transient
//! failures, and releases every handle it creates. Posts are listed and
//! mutated through the same transport.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use murmur::{MemorySessionStore, Murmur, MurmurConfig, Session};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemorySessionStore::with_session(&Session::new("3", "Ada", "t0k")));
//!     let murmur = Murmur::new(MurmurConfig::load()?, store)?;
//!
//!     let mut feed = murmur.feed();
//!     feed.refresh().await?;
//!
//!     for post in feed.posts() {
//!         let mut media = murmur.post_media();
//!         let handles = media.sync(post.media_references()).await;
//!         println!("{}: {} media", post.id(), handles.len());
//!         media.teardown();
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `murmur_error` - Error taxonomy
//! - `murmur_core` - Sessions, media references, posts, configuration
//! - `murmur_transport` - Credential provider and retrying transport client
//! - `murmur_media` - Handle lifecycle, media resolution, video reloads
//! - `murmur_posts` - Post mutation client and local feed
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod observability;

pub use context::Murmur;
pub use observability::{ObservabilityConfig, init_observability};

pub use murmur_core::*;
pub use murmur_error::*;
pub use murmur_media::*;
pub use murmur_posts::*;
pub use murmur_transport::*;
