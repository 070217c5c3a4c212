//! Media resolution service.

use crate::{ResourceHandle, ResourceLifecycleManager};
use futures::future::join_all;
use murmur_core::{MediaConfig, MediaId, MediaKind, MediaReference, MediaStrategy};
use murmur_transport::TransportClient;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

fn default_content_type(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "image/*",
        MediaKind::Video => "video/*",
    }
}

/// Resolves server-declared media references into renderable handles.
///
/// Failures never propagate: a reference that cannot be fetched degrades to
/// a direct URL, and one that cannot even be addressed becomes
/// [`ResourceHandle::Unavailable`].
#[derive(Debug, Clone)]
pub struct MediaResolver {
    transport: TransportClient,
    lifecycle: Arc<ResourceLifecycleManager>,
    origin: String,
    strategy: MediaStrategy,
}

impl MediaResolver {
    /// Resolver fetching through `transport` and recording handles in `lifecycle`.
    ///
    /// Relative fallbacks are joined onto the configured public origin, or the
    /// transport base URL when none is set.
    pub fn new(
        transport: TransportClient,
        lifecycle: Arc<ResourceLifecycleManager>,
        config: &MediaConfig,
    ) -> Self {
        let origin = config
            .public_origin()
            .clone()
            .unwrap_or_else(|| transport.base_url().as_str().to_string());
        Self {
            transport,
            lifecycle,
            origin: origin.trim_end_matches('/').to_string(),
            strategy: *config.strategy(),
        }
    }

    /// Lifecycle manager holding this resolver's handles.
    pub fn lifecycle(&self) -> &Arc<ResourceLifecycleManager> {
        &self.lifecycle
    }

    /// Strategy in use.
    pub fn strategy(&self) -> MediaStrategy {
        self.strategy
    }

    /// Resolve one reference.
    #[instrument(skip(self), fields(location = %reference.location(), kind = %reference.kind()))]
    pub async fn resolve(&self, reference: &MediaReference) -> ResourceHandle {
        if reference.is_blank() {
            debug!("Blank reference");
            return ResourceHandle::Unavailable;
        }
        if self.strategy == MediaStrategy::Direct {
            return self.direct(reference);
        }

        let Some(media_id) = reference.media_id() else {
            debug!("Reference does not address protected media, using it directly");
            return self.direct(reference);
        };

        match self.transport.fetch_media(&media_id).await {
            Ok(response) => {
                let content_type = response
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| default_content_type(reference.kind()).to_string());
                match self
                    .lifecycle
                    .acquire(media_id, response.into_bytes(), &content_type)
                {
                    Ok(handle) => ResourceHandle::Local(handle),
                    Err(e) => {
                        debug!(error = %e, "Handle not recorded");
                        ResourceHandle::Unavailable
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Authenticated fetch failed, falling back to direct URL");
                self.discard_stale(&media_id);
                self.direct(reference)
            }
        }
    }

    /// Resolve every reference concurrently, keyed by [`MediaReference::key`].
    ///
    /// References sharing a key are fetched once, so a later arrival can
    /// never revoke a handle already placed in the result.
    pub async fn resolve_all(&self, references: &[MediaReference]) -> HashMap<String, ResourceHandle> {
        let mut seen = HashSet::new();
        let resolutions = references
            .iter()
            .map(|reference| (reference.key(), reference))
            .filter(|(key, _)| seen.insert(key.clone()))
            .map(|(key, reference)| async move { (key, self.resolve(reference).await) })
            .collect::<Vec<_>>();
        join_all(resolutions).await.into_iter().collect()
    }

    /// Degraded URL for `reference`, if one can be built.
    ///
    /// Absolute URLs are used as given. Bare identifiers address the media
    /// path on the public origin; other relative locations are joined onto it.
    /// Non-http schemes yield `None`.
    pub fn fallback_url(&self, reference: &MediaReference) -> Option<String> {
        if reference.is_blank() {
            return None;
        }
        let location = reference.location().trim();
        if reference.is_absolute() {
            return Some(location.to_string());
        }
        if !location.contains('/') && !location.contains(':') {
            return Some(format!("{}{}", self.origin, MediaId::new(location).media_path()));
        }
        if location.contains(':') {
            return None;
        }
        Some(format!("{}/{}", self.origin, location.trim_start_matches('/')))
    }

    fn direct(&self, reference: &MediaReference) -> ResourceHandle {
        match self.fallback_url(reference) {
            Some(url) => ResourceHandle::Direct { url },
            None => {
                warn!("No usable fallback for reference");
                ResourceHandle::Unavailable
            }
        }
    }

    /// An earlier local copy must not outlive a failed re-resolution.
    fn discard_stale(&self, media_id: &MediaId) {
        if self.lifecycle.release(media_id) {
            debug!(media_id = %media_id, "Released stale handle after failed fetch");
        }
    }
}
