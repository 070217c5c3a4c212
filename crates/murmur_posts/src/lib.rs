//! Post listing and mutation for the Murmur feed.
//!
//! [`PostClient`] talks to the post collection through the transport client
//! and inherits its retry and authentication handling. [`Feed`] keeps the
//! local list in step with confirmed mutations.
//!
//! # Example
//!
//! ```rust,no_run
//! use murmur_posts::{Feed, PostClient};
//! # use murmur_transport::TransportClient;
//!
//! # async fn example(transport: TransportClient) -> murmur_error::MurmurResult<()> {
//! let mut feed = Feed::new(PostClient::new(transport));
//! feed.refresh().await?;
//! feed.create("first light over the harbour", Vec::new()).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod feed;

pub use client::PostClient;
pub use feed::Feed;
