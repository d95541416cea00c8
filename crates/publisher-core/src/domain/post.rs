use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Store-assigned post identifier.
pub type PostId = i32;

/// Post entity - a published piece of content.
///
/// `content` is opaque pre-rendered markup. It is stored and returned
/// verbatim and never interpreted or sanitized here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Listing projection of a post, without its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: PostId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            created_at: post.created_at,
        }
    }
}

/// Validated input for creating a post.
///
/// Both fields are guaranteed non-empty; `id` and `created_at` are left
/// to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    title: String,
    content: String,
}

impl NewPost {
    /// Build creation input, rejecting an empty title or content.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Result<Self, DomainError> {
        let title = title.into();
        let content = content.into();

        if title.is_empty() || content.is_empty() {
            return Err(DomainError::Validation(
                "missing title or content".to_string(),
            ));
        }

        Ok(Self { title, content })
    }

    /// Split into `(title, content)`.
    pub fn into_parts(self) -> (String, String) {
        (self.title, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_accepts_markup_verbatim() {
        let (title, content) = NewPost::new("Hello", "<p>World</p>").unwrap().into_parts();
        assert_eq!(title, "Hello");
        assert_eq!(content, "<p>World</p>");
    }

    #[test]
    fn test_new_post_rejects_empty_title() {
        let err = NewPost::new("", "body").unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg == "missing title or content"));
    }

    #[test]
    fn test_new_post_rejects_empty_content() {
        assert!(matches!(
            NewPost::new("Title", ""),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_whitespace_is_present() {
        // Only absence is checked; whitespace-only fields are kept as given.
        assert!(NewPost::new(" ", " ").is_ok());
    }

    #[test]
    fn test_summary_drops_content() {
        let post = Post {
            id: 7,
            title: "Title".to_string(),
            content: "<p>large</p>".to_string(),
            created_at: Utc::now(),
        };
        let summary = PostSummary::from(&post);
        assert_eq!(summary.id, 7);
        assert_eq!(summary.title, "Title");
        assert_eq!(summary.created_at, post.created_at);
    }
}
