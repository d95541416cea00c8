//! In-memory post store - used when no database is configured.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use publisher_core::ports::PostRepository;
use publisher_core::{NewPost, Post, PostId, PostSummary, RepoError};

struct PostTable {
    next_id: PostId,
    last_created_at: Option<DateTime<Utc>>,
    rows: BTreeMap<PostId, Post>,
}

/// In-memory post repository using a map behind an async RwLock.
///
/// Ids are never reused, even after deletion. Note: data is lost on
/// process restart.
pub struct InMemoryPostRepository {
    table: RwLock<PostTable>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(PostTable {
                next_id: 1,
                last_created_at: None,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;

        let id = table.next_id;
        table.next_id = id
            .checked_add(1)
            .ok_or_else(|| RepoError::Constraint("post id sequence exhausted".to_string()))?;

        // Wall clock may step backwards; creation times may not.
        let now = Utc::now();
        let created_at = match table.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        table.last_created_at = Some(created_at);

        let (title, content) = new_post.into_parts();
        let post = Post {
            id,
            title,
            content,
            created_at,
        };
        table.rows.insert(id, post.clone());

        tracing::debug!(post_id = id, "Stored post in memory");
        Ok(post)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<PostSummary>, RepoError> {
        let table = self.table.read().await;

        let mut summaries: Vec<PostSummary> = table.rows.values().map(PostSummary::from).collect();
        summaries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(summaries)
    }

    async fn delete_many(&self, ids: &BTreeSet<PostId>) -> Result<u64, RepoError> {
        let mut table = self.table.write().await;

        let deleted = ids
            .iter()
            .filter(|id| table.rows.remove(*id).is_some())
            .count() as u64;

        Ok(deleted)
    }
}
