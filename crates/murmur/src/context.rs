//! Dependency-injection context.

use murmur_core::MurmurConfig;
use murmur_error::{MediaError, MediaErrorKind, MurmurResult};
use murmur_media::{
    BlobRegistry, InMemoryBlobRegistry, LocalHandle, MediaResolver, PostMedia,
    ResourceLifecycleManager, VideoLoader,
};
use murmur_posts::{Feed, PostClient};
use murmur_transport::{CredentialProvider, HttpBackend, SessionEvent, SessionStore, TransportClient};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, instrument};

/// Everything the presentation layer needs, wired from one configuration
/// and one session store.
///
/// Session state is passed in explicitly; nothing is looked up globally.
#[derive(Debug, Clone)]
pub struct Murmur {
    config: MurmurConfig,
    transport: TransportClient,
    posts: PostClient,
    registry: Arc<dyn BlobRegistry>,
}

impl Murmur {
    /// Context over the reqwest backend.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the transport cannot be built.
    pub fn new(config: MurmurConfig, store: Arc<dyn SessionStore>) -> MurmurResult<Self> {
        let credentials = CredentialProvider::new(store, *config.transport().credential_scheme());
        let transport = TransportClient::new(config.transport().clone(), credentials)?;
        Ok(Self::assemble(config, transport))
    }

    /// Context over an arbitrary HTTP backend.
    pub fn with_backend(
        config: MurmurConfig,
        store: Arc<dyn SessionStore>,
        backend: Arc<dyn HttpBackend>,
    ) -> MurmurResult<Self> {
        let credentials = CredentialProvider::new(store, *config.transport().credential_scheme());
        let transport = TransportClient::with_backend(config.transport().clone(), credentials, backend)?;
        Ok(Self::assemble(config, transport))
    }

    fn assemble(config: MurmurConfig, transport: TransportClient) -> Self {
        debug!(strategy = %config.media().strategy(), "Murmur context ready");
        Self {
            posts: PostClient::new(transport.clone()),
            config,
            transport,
            registry: Arc::new(InMemoryBlobRegistry::new()),
        }
    }

    /// Use `registry` for local media handles.
    pub fn with_registry(mut self, registry: Arc<dyn BlobRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &MurmurConfig {
        &self.config
    }

    /// Shared transport client.
    pub fn transport(&self) -> &TransportClient {
        &self.transport
    }

    /// Credential provider over the session store.
    pub fn credentials(&self) -> &CredentialProvider {
        self.transport.credentials()
    }

    /// Post client.
    pub fn posts(&self) -> &PostClient {
        &self.posts
    }

    /// Blob registry backing local handles.
    pub fn registry(&self) -> &Arc<dyn BlobRegistry> {
        &self.registry
    }

    /// Fresh, empty feed.
    pub fn feed(&self) -> Feed {
        Feed::new(self.posts.clone())
    }

    /// Resolver with its own lifecycle manager, for one owning view.
    pub fn resolver(&self) -> MediaResolver {
        let lifecycle = Arc::new(ResourceLifecycleManager::new(self.registry.clone()));
        MediaResolver::new(self.transport.clone(), lifecycle, self.config.media())
    }

    /// Media view for one displayed post.
    pub fn post_media(&self) -> PostMedia {
        PostMedia::new(self.resolver())
    }

    /// Video loader for one displayed video.
    pub fn video_loader(&self) -> VideoLoader {
        VideoLoader::new(self.resolver(), self.config.media())
    }

    /// Write the bytes behind a live local handle to `path`.
    ///
    /// # Errors
    ///
    /// Returns a media error if the handle was already released or the file
    /// cannot be written.
    #[instrument(skip(self, handle), fields(url = %handle.url(), path = %path.display()))]
    pub async fn save_media(&self, handle: &LocalHandle, path: &Path) -> MurmurResult<usize> {
        let blob = self.registry.open(handle.url()).ok_or_else(|| {
            MediaError::new(MediaErrorKind::UnusableReference(handle.url().to_string()))
        })?;
        tokio::fs::write(path, blob.bytes()).await.map_err(|e| {
            MediaError::new(MediaErrorKind::FileWrite(format!("{}: {}", path.display(), e)))
        })?;
        debug!(bytes = blob.bytes().len(), "Media saved");
        Ok(blob.bytes().len())
    }

    /// Session events such as re-authentication requests.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.transport.subscribe()
    }
}
