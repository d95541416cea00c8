use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostId, PostSummary};
use crate::error::RepoError;

/// Post store - durable create/read/list/delete over posts.
///
/// Every call is its own unit of work. Implementations never retry;
/// storage failures are returned as [`RepoError`].
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post. The store assigns `id` and `created_at`.
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError>;

    /// Find a post by id. `None` means no such post.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError>;

    /// All posts, newest first. Ties on `created_at` put the higher id first.
    async fn list_all(&self) -> Result<Vec<PostSummary>, RepoError>;

    /// Delete every post whose id is in `ids`, all or nothing.
    /// Unknown ids are ignored; returns the number of rows removed.
    async fn delete_many(&self, ids: &BTreeSet<PostId>) -> Result<u64, RepoError>;
}
