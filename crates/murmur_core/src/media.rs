//! Server-declared media references.

use serde::{Deserialize, Serialize};

/// Path prefix under which the service serves protected media.
pub const MEDIA_PATH_PREFIX: &str = "/api/media/";

/// Stable identifier of a media object, embeddable in `/api/media/{id}`.
///
/// # Examples
///
/// ```
/// use murmur_core::MediaId;
///
/// let id = MediaId::new("64f1c0ffee");
/// assert_eq!(id.as_str(), "64f1c0ffee");
/// assert_eq!(id.media_path(), "/api/media/64f1c0ffee");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct MediaId(String);

impl MediaId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Retrieval path for this identifier.
    pub fn media_path(&self) -> String {
        format!("{}{}", MEDIA_PATH_PREFIX, self.0)
    }
}

/// Kind of media attached to a post.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image (PNG, JPEG, GIF, WebP)
    #[display("image")]
    Image,
    /// Video (MP4, QuickTime, WebM)
    #[display("video")]
    Video,
}

impl MediaKind {
    /// Kind implied by a MIME type, if it names image or video content.
    ///
    /// ```
    /// use murmur_core::MediaKind;
    ///
    /// assert_eq!(MediaKind::from_content_type("video/mp4"), Some(MediaKind::Video));
    /// assert_eq!(MediaKind::from_content_type("image/png; q=1"), Some(MediaKind::Image));
    /// assert_eq!(MediaKind::from_content_type("application/json"), None);
    /// ```
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        if essence.starts_with("video/") {
            Some(MediaKind::Video)
        } else if essence.starts_with("image/") {
            Some(MediaKind::Image)
        } else {
            None
        }
    }
}

/// A pointer to a binary resource, as declared by the server on a post.
///
/// The location is either an opaque identifier (`64f1c0ffee`), a path
/// (`/api/media/64f1c0ffee`, `/api/uploads/cat.png`) or an absolute URL.
/// References are immutable; the media layer never rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaReference {
    location: String,
    kind: MediaKind,
}

impl MediaReference {
    /// Create a reference of the given kind.
    pub fn new(location: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            location: location.into(),
            kind,
        }
    }

    /// Image reference.
    pub fn image(location: impl Into<String>) -> Self {
        Self::new(location, MediaKind::Image)
    }

    /// Video reference.
    pub fn video(location: impl Into<String>) -> Self {
        Self::new(location, MediaKind::Video)
    }

    /// The location as declared by the server.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Declared kind.
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// True when the reference carries nothing usable.
    pub fn is_blank(&self) -> bool {
        self.location.trim().is_empty()
    }

    /// True when the location is an absolute `http(s)` URL.
    pub fn is_absolute(&self) -> bool {
        let location = self.location.trim();
        location.starts_with("http://") || location.starts_with("https://")
    }

    /// Identifier of the protected media object this reference points at.
    ///
    /// Bare identifiers are their own id; URLs yield the segment after
    /// `/api/media/`. Any other URL has no identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use murmur_core::{MediaId, MediaReference};
    ///
    /// assert_eq!(MediaReference::image("42").media_id(), Some(MediaId::new("42")));
    /// assert_eq!(
    ///     MediaReference::video("http://localhost:8080/api/media/abc?x=1").media_id(),
    ///     Some(MediaId::new("abc"))
    /// );
    /// assert_eq!(MediaReference::image("/api/uploads/cat.png").media_id(), None);
    /// ```
    pub fn media_id(&self) -> Option<MediaId> {
        let location = self.location.trim();
        if location.is_empty() {
            return None;
        }
        if !location.contains('/') && !location.contains(':') {
            return Some(MediaId::new(location));
        }
        let (_, rest) = location.split_once(MEDIA_PATH_PREFIX)?;
        let id = rest.split(['/', '?', '#']).next().unwrap_or_default();
        (!id.is_empty()).then(|| MediaId::new(id))
    }

    /// Key under which resolution results for this reference are reported.
    ///
    /// The media id when there is one, otherwise the trimmed location.
    pub fn key(&self) -> String {
        self.media_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| self.location.trim().to_string())
    }
}
