//! Post lifecycle handlers.

use actix_web::{Either, HttpRequest, HttpResponse, http::header, web};

use publisher_core::{DomainError, NewPost, Post, PostId, PostSummary};
use publisher_shared::dto::{
    DeletePostsRequest, DeletePostsResponse, PostResponse, PostSummaryResponse, PublishPostRequest,
};
use publisher_shared::{ApiResponse, DeleteSelection};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Publish body - JSON or urlencoded form.
type PublishBody = Either<web::Json<PublishPostRequest>, web::Form<PublishPostRequest>>;

/// Delete body - JSON, or raw form pairs so that `postIds` may repeat.
type DeleteBody = Either<web::Json<DeletePostsRequest>, web::Form<Vec<(String, String)>>>;

/// Where a post can be fetched.
pub fn post_location(id: PostId) -> String {
    format!("/publisher/post/{}", id)
}

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        created_at: post.created_at,
    }
}

fn summary_response(summary: PostSummary) -> PostSummaryResponse {
    PostSummaryResponse {
        id: summary.id,
        title: summary.title,
        created_at: summary.created_at,
    }
}

/// POST /publisher/publish and POST /publisher/add
pub async fn publish(state: web::Data<AppState>, body: PublishBody) -> AppResult<HttpResponse> {
    let req = match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };

    let new_post = NewPost::new(
        req.title.unwrap_or_default(),
        req.content.unwrap_or_default(),
    )?;

    let post = state.posts.create(new_post).await?;
    tracing::info!(post_id = post.id, "Post published");

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, post_location(post.id)))
        .json(ApiResponse::ok(post_response(post))))
}

/// GET /publisher/post/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound {
            entity_type: "Post",
            id,
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post))))
}

/// GET /publisher/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let summaries: Vec<PostSummaryResponse> = state
        .posts
        .list_all()
        .await?
        .into_iter()
        .map(summary_response)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(summaries)))
}

/// POST /publisher/posts - bulk delete.
///
/// Without `action=delete` or without ids nothing is removed and the
/// request still succeeds. A request with no body at all counts as an empty
/// selection.
pub async fn delete_posts(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Option<DeleteBody>,
) -> AppResult<HttpResponse> {
    let selection = match body {
        Some(Either::Left(json)) => DeleteSelection::from_request(json.into_inner())?,
        Some(Either::Right(form)) => DeleteSelection::from_form_pairs(form.into_inner())?,
        // A typed body that failed to parse is still the caller's error.
        None if req.headers().contains_key(header::CONTENT_TYPE) => {
            return Err(AppError::BadRequest("Unreadable delete request body".into()));
        }
        None => DeleteSelection::default(),
    };

    if !selection.is_actionable() {
        tracing::debug!("Delete request without selection, skipping");
        return Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
            DeletePostsResponse { deleted: 0 },
            "Nothing to delete",
        )));
    }

    let deleted = state.posts.delete_many(selection.ids()).await?;
    tracing::info!(
        requested = selection.ids().len(),
        deleted,
        "Posts deleted"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        DeletePostsResponse { deleted },
        format!("Deleted {} post(s)", deleted),
    )))
}
