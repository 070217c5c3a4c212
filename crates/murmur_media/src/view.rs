//! Per-post media view.

use crate::{MediaResolver, ResourceHandle};
use murmur_core::{MediaId, MediaReference};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Resolved media for one displayed post.
///
/// Owns a resolver whose lifecycle manager is private to this view, so
/// [`teardown`](Self::teardown) releases exactly the handles this post
/// acquired.
#[derive(Debug)]
pub struct PostMedia {
    resolver: MediaResolver,
    references: Vec<MediaReference>,
    handles: HashMap<String, ResourceHandle>,
}

impl PostMedia {
    /// Empty view over `resolver`.
    pub fn new(resolver: MediaResolver) -> Self {
        Self {
            resolver,
            references: Vec::new(),
            handles: HashMap::new(),
        }
    }

    /// Bring the view in line with the post's current references.
    ///
    /// Nothing happens when the list is unchanged. Otherwise handles for
    /// identifiers no longer referenced are released and every reference is
    /// resolved again.
    #[instrument(skip(self, references), fields(count = references.len()))]
    pub async fn sync(&mut self, references: Vec<MediaReference>) -> &HashMap<String, ResourceHandle> {
        if references == self.references && !self.handles.is_empty() {
            return &self.handles;
        }

        let current: HashSet<MediaId> = references.iter().filter_map(MediaReference::media_id).collect();
        for stale in self
            .resolver
            .lifecycle()
            .tracked()
            .into_iter()
            .filter(|id| !current.contains(id))
        {
            debug!(media_id = %stale, "Reference removed from post");
            self.resolver.lifecycle().release(&stale);
        }

        self.handles = self.resolver.resolve_all(&references).await;
        self.references = references;
        &self.handles
    }

    /// Resolve a single reference again, as a manual "try again".
    pub async fn retry(&mut self, reference: &MediaReference) -> ResourceHandle {
        let handle = self.resolver.resolve(reference).await;
        self.handles.insert(reference.key(), handle.clone());
        handle
    }

    /// Handle for `reference`, if resolved.
    pub fn handle(&self, reference: &MediaReference) -> Option<&ResourceHandle> {
        self.handles.get(&reference.key())
    }

    /// All resolved handles keyed by reference key.
    pub fn handles(&self) -> &HashMap<String, ResourceHandle> {
        &self.handles
    }

    /// References currently displayed.
    pub fn references(&self) -> &[MediaReference] {
        &self.references
    }

    /// Resolver backing this view.
    pub fn resolver(&self) -> &MediaResolver {
        &self.resolver
    }

    /// Release every handle; the view resolves nothing afterwards.
    pub fn teardown(&mut self) -> usize {
        self.handles.clear();
        self.resolver.lifecycle().release_all()
    }
}
