//! Posts as returned by the post service.

use crate::MediaReference;
use crate::serde_helpers::{null_as_default, string_or_number, timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, deserialize_with = "string_or_number")]
    id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    user_id: String,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    content: String,
    #[serde(default, with = "timestamp")]
    created_at: Option<DateTime<Utc>>,
}

/// A post in its server-canonical form.
///
/// The media layer never mutates a post; the service's copy returned from a
/// create or update replaces the local one wholesale.
///
/// # Examples
///
/// ```
/// use murmur_core::{MediaKind, Post};
///
/// let post: Post = serde_json::from_value(serde_json::json!({
///     "id": "p1",
///     "userId": 3,
///     "content": "hello",
///     "imageUrls": ["/api/media/a", "/api/media/b"],
///     "videoUrl": "/api/media/v",
///     "createdAt": "2024-03-01T10:15:00",
///     "likes": 2,
///     "comments": null
/// }))
/// .unwrap();
///
/// assert_eq!(post.user_id(), "3");
/// let refs = post.media_references();
/// assert_eq!(refs.len(), 3);
/// assert_eq!(refs[0].kind(), MediaKind::Video);
/// assert_eq!(post.comment_count(), 0);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", strip_option, into)]
pub struct Post {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    user_id: String,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    user_profile_picture: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    image_urls: Vec<String>,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default, with = "timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    likes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    comments: Vec<Comment>,
}

impl Post {
    /// Create a post with no media or engagement.
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            user_name: None,
            user_profile_picture: None,
            content: content.into(),
            image_urls: Vec::new(),
            video_url: None,
            created_at: None,
            likes: 0,
            comments: Vec::new(),
        }
    }

    /// Declared media: the video first, then each image, in server order.
    pub fn media_references(&self) -> Vec<MediaReference> {
        self.video_url
            .iter()
            .map(MediaReference::video)
            .chain(self.image_urls.iter().map(MediaReference::image))
            .collect()
    }

    /// Number of comments.
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Whether `user_id` authored this post.
    pub fn is_authored_by(&self, user_id: &str) -> bool {
        !user_id.is_empty() && self.user_id == user_id
    }
}
