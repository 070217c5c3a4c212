//! Presentation-level video reloads.
//!
//! Videos get a bounded number of reloads on top of the transport's own
//! retry budget. The bound and transitions live in [`VideoPlayback`], a
//! plain state machine; [`VideoLoader`] drives it against the resolver.

use crate::{MediaResolver, ResourceHandle};
use murmur_core::{MediaConfig, MediaReference};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Playback state of one video.
#[derive(Debug, Clone, PartialEq, Eq, Default, derive_more::Display)]
pub enum VideoState {
    /// Not started
    #[default]
    #[display("idle")]
    Idle,
    /// Load in progress; `reloads` counts reloads already spent
    #[display("loading (reload {})", reloads)]
    Loading {
        /// Reloads spent so far
        reloads: u32,
    },
    /// Playable
    #[display("ready")]
    Ready {
        /// Handle being played
        handle: ResourceHandle,
    },
    /// Load failed; a reload is due
    #[display("failed (reload {})", reloads)]
    Failed {
        /// Reloads spent so far
        reloads: u32,
    },
    /// Reload budget spent; only a manual retry leaves this state
    #[display("failed to load")]
    FailedTerminal {
        /// URL for opening the video outside the feed
        fallback_url: Option<String>,
    },
}

/// Video reload state machine.
///
/// `Idle → Loading(0) → Ready | Failed(n) → Loading(n+1) | FailedTerminal`.
/// Out-of-order events are ignored and reported as `false`.
///
/// ```
/// use murmur_media::{VideoPlayback, VideoState};
///
/// let mut playback = VideoPlayback::new(1);
/// assert!(playback.begin());
/// assert!(playback.failed(None));
/// assert!(playback.reload());
/// assert!(playback.failed(Some("https://cdn.example.com/v.mp4".into())));
/// assert!(playback.is_terminal());
/// assert!(!playback.reload());
///
/// assert!(playback.retry());
/// assert_eq!(*playback.state(), VideoState::Loading { reloads: 0 });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPlayback {
    state: VideoState,
    max_reloads: u32,
}

impl VideoPlayback {
    /// Machine allowing `max_reloads` reloads after the first load.
    pub fn new(max_reloads: u32) -> Self {
        Self {
            state: VideoState::Idle,
            max_reloads,
        }
    }

    /// Current state.
    pub fn state(&self) -> &VideoState {
        &self.state
    }

    /// Reload bound.
    pub fn max_reloads(&self) -> u32 {
        self.max_reloads
    }

    /// Start the first load.
    pub fn begin(&mut self) -> bool {
        match self.state {
            VideoState::Idle => {
                self.state = VideoState::Loading { reloads: 0 };
                true
            }
            _ => false,
        }
    }

    /// The current load produced a playable handle.
    pub fn loaded(&mut self, handle: ResourceHandle) -> bool {
        match self.state {
            VideoState::Loading { .. } => {
                self.state = VideoState::Ready { handle };
                true
            }
            _ => false,
        }
    }

    /// The current load failed. Moves to `Failed` while reloads remain,
    /// otherwise to `FailedTerminal` carrying `fallback_url`.
    pub fn failed(&mut self, fallback_url: Option<String>) -> bool {
        match self.state {
            VideoState::Loading { reloads } if reloads < self.max_reloads => {
                self.state = VideoState::Failed { reloads };
                true
            }
            VideoState::Loading { .. } => {
                self.state = VideoState::FailedTerminal { fallback_url };
                true
            }
            _ => false,
        }
    }

    /// Spend one reload.
    pub fn reload(&mut self) -> bool {
        match self.state {
            VideoState::Failed { reloads } => {
                self.state = VideoState::Loading { reloads: reloads + 1 };
                true
            }
            _ => false,
        }
    }

    /// Manual "try again" from the terminal state; resets the budget.
    pub fn retry(&mut self) -> bool {
        match self.state {
            VideoState::FailedTerminal { .. } => {
                self.state = VideoState::Loading { reloads: 0 };
                true
            }
            _ => false,
        }
    }

    /// Playable.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, VideoState::Ready { .. })
    }

    /// Waiting on a manual retry.
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, VideoState::FailedTerminal { .. })
    }
}

/// Drives [`VideoPlayback`] by re-resolving the reference after each failure.
#[derive(Debug, Clone)]
pub struct VideoLoader {
    resolver: MediaResolver,
    max_reloads: u32,
    reload_delay: Duration,
}

impl VideoLoader {
    /// Loader using the reload bound and delay from `config`.
    pub fn new(resolver: MediaResolver, config: &MediaConfig) -> Self {
        Self {
            resolver,
            max_reloads: *config.video_max_reloads(),
            reload_delay: config.video_reload_delay(),
        }
    }

    /// Load `reference`, treating only locally held handles as playable.
    pub async fn load(&self, reference: &MediaReference) -> VideoPlayback {
        self.load_with(reference, ResourceHandle::is_local).await
    }

    /// Load `reference`, with `playable` deciding whether a handle plays.
    pub async fn load_with<F>(&self, reference: &MediaReference, playable: F) -> VideoPlayback
    where
        F: Fn(&ResourceHandle) -> bool,
    {
        let mut playback = VideoPlayback::new(self.max_reloads);
        playback.begin();
        self.drive(&mut playback, reference, &playable).await;
        playback
    }

    /// Manual retry of a terminally failed video.
    pub async fn retry<F>(&self, playback: &mut VideoPlayback, reference: &MediaReference, playable: F)
    where
        F: Fn(&ResourceHandle) -> bool,
    {
        if playback.retry() {
            self.drive(playback, reference, &playable).await;
        }
    }

    #[instrument(skip(self, playback, playable), fields(location = %reference.location()))]
    async fn drive<F>(&self, playback: &mut VideoPlayback, reference: &MediaReference, playable: &F)
    where
        F: Fn(&ResourceHandle) -> bool,
    {
        loop {
            let handle = self.resolver.resolve(reference).await;
            if playable(&handle) {
                playback.loaded(handle);
                return;
            }

            playback.failed(self.resolver.fallback_url(reference));
            if playback.is_terminal() {
                warn!(max_reloads = self.max_reloads, "Video failed to load");
                return;
            }

            debug!(state = %playback.state(), delay_ms = self.reload_delay.as_millis() as u64, "Reloading video");
            tokio::time::sleep(self.reload_delay).await;
            playback.reload();
        }
    }
}
