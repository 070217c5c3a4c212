//! Local object URL registry.
//!
//! A [`BlobRegistry`] holds binary payloads already transferred into the
//! client and hands out opaque object URLs the renderer can load. Every URL
//! it creates must be revoked exactly once.

use bytes::Bytes;
use derive_getters::Getters;
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// Scheme prefix of object URLs minted by this crate.
pub const OBJECT_URL_PREFIX: &str = "blob:murmur/";

/// Opaque, session-scoped address of a registered blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    /// Fresh, unique object URL.
    pub fn generate() -> Self {
        Self(format!("{}{}", OBJECT_URL_PREFIX, uuid::Uuid::new_v4()))
    }

    /// Borrow the URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A registered payload.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Blob {
    bytes: Bytes,
    content_type: String,
}

/// Counters describing registry activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters)]
pub struct RegistryStats {
    /// Object URLs created
    created: usize,
    /// Object URLs revoked
    revoked: usize,
    /// Revocations of URLs that were not live
    stale_revocations: usize,
}

impl RegistryStats {
    /// URLs created and not yet revoked.
    pub fn live(&self) -> usize {
        self.created - self.revoked
    }
}

/// Registry of locally addressable blobs.
pub trait BlobRegistry: Send + Sync + fmt::Debug {
    /// Register `bytes` and return a new URL for them.
    fn create(&self, bytes: Bytes, content_type: &str) -> ObjectUrl;

    /// Revoke `url`. Returns `false` when the URL was not live.
    fn revoke(&self, url: &ObjectUrl) -> bool;

    /// Payload behind a live URL.
    fn open(&self, url: &ObjectUrl) -> Option<Blob>;

    /// Activity counters.
    fn stats(&self) -> RegistryStats;
}

/// Process-local registry backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryBlobRegistry {
    blobs: RwLock<HashMap<ObjectUrl, Blob>>,
    created: AtomicUsize,
    revoked: AtomicUsize,
    stale_revocations: AtomicUsize,
}

impl InMemoryBlobRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobRegistry for InMemoryBlobRegistry {
    fn create(&self, bytes: Bytes, content_type: &str) -> ObjectUrl {
        let url = ObjectUrl::generate();
        let blob = Blob {
            bytes,
            content_type: content_type.to_string(),
        };
        self.blobs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(url.clone(), blob);
        self.created.fetch_add(1, Ordering::SeqCst);
        url
    }

    fn revoke(&self, url: &ObjectUrl) -> bool {
        let removed = self
            .blobs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(url)
            .is_some();
        if removed {
            self.revoked.fetch_add(1, Ordering::SeqCst);
        } else {
            warn!(url = %url, "Revoking an object URL that is not live");
            self.stale_revocations.fetch_add(1, Ordering::SeqCst);
        }
        removed
    }

    fn open(&self, url: &ObjectUrl) -> Option<Blob> {
        self.blobs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(url)
            .cloned()
    }

    fn stats(&self) -> RegistryStats {
        RegistryStats {
            created: self.created.load(Ordering::SeqCst),
            revoked: self.revoked.load(Ordering::SeqCst),
            stale_revocations: self.stale_revocations.load(Ordering::SeqCst),
        }
    }
}
