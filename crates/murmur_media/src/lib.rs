//! Media resolution for the Murmur feed client.
//!
//! Turns server-declared media references into handles a renderer can load.
//! Protected media is fetched through the transport client with the session
//! credential and held locally behind an object URL; anything that cannot be
//! fetched degrades to its direct URL or to a placeholder.
//!
//! | Type | Role |
//! |---|---|
//! | [`BlobRegistry`] | Mints and revokes object URLs |
//! | [`ResourceLifecycleManager`] | One live handle per media id, each revoked exactly once |
//! | [`MediaResolver`] | Reference → handle, with fallback |
//! | [`PostMedia`] | The handles of one displayed post |
//! | [`VideoLoader`] | Bounded presentation-level video reloads |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod lifecycle;
mod registry;
mod resolver;
mod video;
mod view;

pub use lifecycle::{LocalHandle, ResourceHandle, ResourceLifecycleManager};
pub use registry::{
    Blob, BlobRegistry, InMemoryBlobRegistry, OBJECT_URL_PREFIX, ObjectUrl, RegistryStats,
};
pub use resolver::MediaResolver;
pub use video::{VideoLoader, VideoPlayback, VideoState};
pub use view::PostMedia;
