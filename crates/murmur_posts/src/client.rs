//! Post listing and mutation.

use murmur_core::{MediaKind, Post, UploadFile};
use murmur_error::{MurmurResult, ValidationError};
use murmur_transport::{FormPart, Method, RequestOptions, TransportClient};
use tracing::{debug, info, instrument};

const POSTS_PATH: &str = "/api/posts";

/// Creates, updates, deletes and lists posts through the transport client.
///
/// Preconditions are checked before any network call, so a
/// [`ValidationError`] never costs a request. Callers re-resolve media
/// after a mutation; this client does not touch media handles.
#[derive(Debug, Clone)]
pub struct PostClient {
    transport: TransportClient,
}

impl PostClient {
    /// Client over `transport`.
    pub fn new(transport: TransportClient) -> Self {
        Self { transport }
    }

    /// Underlying transport.
    pub fn transport(&self) -> &TransportClient {
        &self.transport
    }

    /// All posts, newest first as the service orders them.
    #[instrument(skip(self))]
    pub async fn list(&self) -> MurmurResult<Vec<Post>> {
        let posts: Vec<Post> = self.transport.get_json(POSTS_PATH).await?;
        debug!(count = posts.len(), "Listed posts");
        Ok(posts)
    }

    /// Posts authored by `user_id`.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: &str) -> MurmurResult<Vec<Post>> {
        let user_id = require_id(user_id, "user id")?;
        self.transport
            .get_json(&format!("{}/user/{}", POSTS_PATH, user_id))
            .await
    }

    /// Publish a post.
    ///
    /// # Errors
    ///
    /// Fails with a validation error when content and files are both empty,
    /// when more than one video is attached, or when nobody is signed in.
    #[instrument(skip(self, content, files), fields(files = files.len()))]
    pub async fn create(&self, content: &str, files: Vec<UploadFile>) -> MurmurResult<Post> {
        let parts = self.form(content, files)?;
        let post: Post = self.transport.upload(Method::POST, POSTS_PATH, parts).await?;
        info!(post_id = %post.id(), "Created post");
        Ok(post)
    }

    /// Replace a post's content and append media. The returned post is the
    /// service's canonical copy.
    #[instrument(skip(self, content, files), fields(files = files.len()))]
    pub async fn update(
        &self,
        post_id: &str,
        content: &str,
        files: Vec<UploadFile>,
    ) -> MurmurResult<Post> {
        let post_id = require_id(post_id, "post id")?;
        let parts = self.form(content, files)?;
        let post: Post = self
            .transport
            .upload(Method::PUT, &format!("{}/{}", POSTS_PATH, post_id), parts)
            .await?;
        info!(post_id = %post.id(), "Updated post");
        Ok(post)
    }

    /// Delete a post on behalf of the signed-in user.
    ///
    /// Deleting a post that is already gone surfaces the service's error.
    #[instrument(skip(self))]
    pub async fn delete(&self, post_id: &str) -> MurmurResult<()> {
        let post_id = require_id(post_id, "post id")?;
        let user_id = self.acting_user()?;
        self.transport
            .delete(
                &format!("{}/{}", POSTS_PATH, post_id),
                RequestOptions::new().with_query("userId", user_id),
            )
            .await?;
        info!(post_id, "Deleted post");
        Ok(())
    }

    fn acting_user(&self) -> MurmurResult<String> {
        self.transport
            .credentials()
            .current_session()
            .map(|session| session.id().clone())
            .ok_or_else(|| ValidationError::new("You need to sign in first").into())
    }

    fn form(&self, content: &str, files: Vec<UploadFile>) -> MurmurResult<Vec<FormPart>> {
        let content = content.trim();
        if content.is_empty() && files.is_empty() {
            Err(ValidationError::new("Write something or attach a photo or video"))?
        }
        let videos = files.iter().filter(|f| f.kind() == MediaKind::Video).count();
        if videos > 1 {
            Err(ValidationError::new("Only one video can be attached to a post"))?
        }
        let user_id = self.acting_user()?;

        let mut parts = vec![
            FormPart::text("userId", user_id),
            FormPart::text("content", content),
        ];
        parts.extend(files.into_iter().map(|file| match file.kind() {
            MediaKind::Video => FormPart::file("video", file),
            MediaKind::Image => FormPart::file("images", file),
        }));
        Ok(parts)
    }
}

fn require_id<'a>(id: &'a str, what: &str) -> MurmurResult<&'a str> {
    let id = id.trim();
    if id.is_empty() || id.contains('/') {
        Err(ValidationError::new(format!("Invalid {}: {:?}", what, id)))?
    }
    Ok(id)
}
