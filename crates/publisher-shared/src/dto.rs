//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to publish a post. Accepted as JSON or as a urlencoded form.
///
/// Fields are optional so that an absent field is reported the same way
/// as an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishPostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// A post id as a client may send it: a JSON number or a string
/// (checkbox values arrive as strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPostId {
    Number(i64),
    Text(String),
}

/// One value or a list of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// JSON body of a bulk delete request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletePostsRequest {
    pub action: Option<String>,
    #[serde(rename = "postIds")]
    pub post_ids: Option<OneOrMany<RawPostId>>,
}

/// A full post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A post in a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummaryResponse {
    pub id: i32,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a bulk delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletePostsResponse {
    pub deleted: u64,
}
