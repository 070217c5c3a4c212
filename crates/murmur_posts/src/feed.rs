//! Local post list.

use crate::PostClient;
use murmur_core::{Post, UploadFile};
use murmur_error::MurmurResult;
use tracing::{debug, warn};

/// The posts currently shown, changed only by confirmed mutations.
///
/// Every mutation waits for the service before touching the list, so a
/// failure leaves the previous state intact.
#[derive(Debug, Clone)]
pub struct Feed {
    client: PostClient,
    posts: Vec<Post>,
}

impl Feed {
    /// Empty feed.
    pub fn new(client: PostClient) -> Self {
        Self {
            client,
            posts: Vec::new(),
        }
    }

    /// Posts in display order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Post with `post_id`.
    pub fn get(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id() == post_id)
    }

    /// Number of posts shown.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// True when nothing is shown.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Client used for mutations.
    pub fn client(&self) -> &PostClient {
        &self.client
    }

    /// Replace the list with the service's.
    pub async fn refresh(&mut self) -> MurmurResult<&[Post]> {
        self.posts = self.client.list().await?;
        Ok(&self.posts)
    }

    /// Create a post and show it first.
    pub async fn create(&mut self, content: &str, files: Vec<UploadFile>) -> MurmurResult<&Post> {
        let post = self.client.create(content, files).await?;
        self.posts.insert(0, post);
        Ok(&self.posts[0])
    }

    /// Update a post and replace the local copy with the service's.
    pub async fn update(
        &mut self,
        post_id: &str,
        content: &str,
        files: Vec<UploadFile>,
    ) -> MurmurResult<&Post> {
        let post = self.client.update(post_id, content, files).await?;
        let index = match self.posts.iter().position(|p| p.id() == post.id()) {
            Some(index) => {
                self.posts[index] = post;
                index
            }
            None => {
                debug!(post_id = %post.id(), "Updated post was not shown, adding it");
                self.posts.insert(0, post);
                0
            }
        };
        Ok(&self.posts[index])
    }

    /// Delete a post, removing it only once the service confirms.
    pub async fn delete(&mut self, post_id: &str) -> MurmurResult<()> {
        if let Err(e) = self.client.delete(post_id).await {
            warn!(post_id, error = %e, "Delete failed, keeping post");
            return Err(e);
        }
        self.posts.retain(|p| p.id() != post_id.trim());
        Ok(())
    }
}
