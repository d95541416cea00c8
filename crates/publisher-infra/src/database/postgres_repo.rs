//! PostgreSQL post repository.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgFunc;
use sea_orm::{
    ActiveModelTrait, DbConn, DeleteMany, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, Set,
};

use publisher_core::ports::PostRepository;
use publisher_core::{NewPost, Post, PostId, PostSummary, RepoError};

use super::entity::post::{self, Entity as PostEntity, SummaryRow};
use super::errors::map_db_err;

/// PostgreSQL post repository.
///
/// `id` comes from the `posts_id_seq` sequence and `created_at` from the
/// column default, both read back with `RETURNING`.
pub struct PostgresPostRepository {
    db: Arc<DbConn>,
}

impl PostgresPostRepository {
    pub fn new(db: impl Into<Arc<DbConn>>) -> Self {
        Self { db: db.into() }
    }
}

/// Listing query: every column but `content`, newest first, ties broken by id.
pub(crate) fn summaries_query() -> Select<PostEntity> {
    PostEntity::find()
        .select_only()
        .column(post::Column::Id)
        .column(post::Column::Title)
        .column(post::Column::CreatedAt)
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
}

/// Bulk delete bound as a single `int[]` parameter, so the statement size
/// does not grow with the number of ids.
pub(crate) fn delete_query(ids: &BTreeSet<PostId>) -> DeleteMany<PostEntity> {
    let ids: Vec<i32> = ids.iter().copied().collect();
    PostEntity::delete_many()
        .filter(Expr::col((PostEntity, post::Column::Id)).eq(PgFunc::any(Expr::val(ids))))
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let (title, content) = new_post.into_parts();

        let model = post::ActiveModel {
            title: Set(title),
            content: Set(content),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(map_db_err)?;

        tracing::debug!(post_id = model.id, "Inserted post");
        Ok(model.into())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<PostSummary>, RepoError> {
        let rows = summaries_query()
            .into_model::<SummaryRow>()
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_many(&self, ids: &BTreeSet<PostId>) -> Result<u64, RepoError> {
        if ids.is_empty() {
            return Ok(0);
        }

        // One statement, so the whole set is removed atomically.
        let result = delete_query(ids)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        tracing::debug!(
            requested = ids.len(),
            deleted = result.rows_affected,
            "Deleted posts"
        );
        Ok(result.rows_affected)
    }
}
