//! Resource lifecycle manager.
//!
//! Owns the mapping from media identifier to local handle. Each handle
//! placed in the mapping is revoked exactly once: when a newer handle for
//! the same identifier supersedes it, when it is released explicitly, or
//! when the owning view is torn down.

use crate::{BlobRegistry, ObjectUrl};
use bytes::Bytes;
use derive_getters::Getters;
use murmur_core::MediaId;
use murmur_error::{MediaError, MediaErrorKind, MurmurResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

/// A live, locally addressable copy of a media object.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct LocalHandle {
    media_id: MediaId,
    url: ObjectUrl,
    content_type: String,
    size: usize,
}

/// What the renderer is given for one media reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceHandle {
    /// Bytes fetched with the session credential, held locally
    Local(LocalHandle),
    /// Degraded access through the declared URL: unauthenticated and unverified
    Direct {
        /// URL handed to the renderer
        url: String,
    },
    /// Nothing renderable; presentation shows a placeholder
    Unavailable,
}

impl ResourceHandle {
    /// URL the renderer should load, if any.
    pub fn render_url(&self) -> Option<&str> {
        match self {
            ResourceHandle::Local(handle) => Some(handle.url.as_str()),
            ResourceHandle::Direct { url } => Some(url),
            ResourceHandle::Unavailable => None,
        }
    }

    /// True for a locally held handle.
    pub fn is_local(&self) -> bool {
        matches!(self, ResourceHandle::Local(_))
    }

    /// True for anything other than a locally held handle.
    pub fn is_degraded(&self) -> bool {
        !self.is_local()
    }
}

#[derive(Debug, Default)]
struct HandleTable {
    handles: HashMap<MediaId, LocalHandle>,
    torn_down: bool,
}

/// Tracks local handles for one owning view.
///
/// All access to the handle mapping goes through this type; the lock is
/// never held across an await point.
#[derive(Debug)]
pub struct ResourceLifecycleManager {
    registry: Arc<dyn BlobRegistry>,
    table: Mutex<HandleTable>,
}

impl ResourceLifecycleManager {
    /// Manager creating handles in `registry`.
    pub fn new(registry: Arc<dyn BlobRegistry>) -> Self {
        Self {
            registry,
            table: Mutex::new(HandleTable::default()),
        }
    }

    fn table(&self) -> MutexGuard<'_, HandleTable> {
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register `bytes` as the handle for `media_id`.
    ///
    /// A handle already recorded for `media_id` is revoked first.
    ///
    /// # Errors
    ///
    /// Returns [`MediaErrorKind::TornDown`] once [`release_all`](Self::release_all)
    /// has run; no blob is created in that case.
    #[instrument(skip(self, bytes), fields(media_id = %media_id, size = bytes.len()))]
    pub fn acquire(
        &self,
        media_id: MediaId,
        bytes: Bytes,
        content_type: &str,
    ) -> MurmurResult<LocalHandle> {
        let mut table = self.table();
        if table.torn_down {
            debug!("View already torn down, discarding payload");
            return Err(MediaError::new(MediaErrorKind::TornDown(media_id.to_string())).into());
        }

        let size = bytes.len();
        let url = self.registry.create(bytes, content_type);
        let handle = LocalHandle {
            media_id: media_id.clone(),
            url,
            content_type: content_type.to_string(),
            size,
        };

        if let Some(previous) = table.handles.insert(media_id, handle.clone()) {
            debug!(previous = %previous.url, "Revoking superseded handle");
            self.registry.revoke(&previous.url);
        }
        debug!(url = %handle.url, "Acquired handle");
        Ok(handle)
    }

    /// Revoke and forget the handle for `media_id`. No-op when absent.
    pub fn release(&self, media_id: &MediaId) -> bool {
        let removed = self.table().handles.remove(media_id);
        match removed {
            Some(handle) => {
                debug!(media_id = %media_id, url = %handle.url, "Released handle");
                self.registry.revoke(&handle.url);
                true
            }
            None => false,
        }
    }

    /// Revoke every tracked handle and refuse further acquisitions.
    ///
    /// Returns the number of handles revoked. Idempotent.
    pub fn release_all(&self) -> usize {
        let drained: Vec<LocalHandle> = {
            let mut table = self.table();
            table.torn_down = true;
            table.handles.drain().map(|(_, handle)| handle).collect()
        };
        for handle in &drained {
            self.registry.revoke(&handle.url);
        }
        if !drained.is_empty() {
            debug!(count = drained.len(), "Released all handles");
        }
        drained.len()
    }

    /// Current handle for `media_id`.
    pub fn get(&self, media_id: &MediaId) -> Option<LocalHandle> {
        self.table().handles.get(media_id).cloned()
    }

    /// Identifiers with a live handle.
    pub fn tracked(&self) -> Vec<MediaId> {
        let mut ids: Vec<MediaId> = self.table().handles.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of live handles.
    pub fn live_count(&self) -> usize {
        self.table().handles.len()
    }

    /// Whether the owning view has been torn down.
    pub fn is_torn_down(&self) -> bool {
        self.table().torn_down
    }

    /// Registry backing the handles.
    pub fn registry(&self) -> &Arc<dyn BlobRegistry> {
        &self.registry
    }
}

impl Drop for ResourceLifecycleManager {
    fn drop(&mut self) {
        self.release_all();
    }
}
