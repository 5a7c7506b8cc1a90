//! Comment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Comment identifier.
    pub id: i64,
    /// Blog of the commented post.
    pub blog_id: i64,
    /// Commented post.
    pub post_id: i64,
    /// Commenter's login handle.
    pub user_id: String,
    /// Comment text.
    pub content: String,
    /// When the comment was written.
    pub created_at: DateTime<Utc>,
    /// Last edit.
    pub modified_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Whether `user_id` wrote this comment.
    pub fn is_written_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Data required to create a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    /// Blog of the post.
    pub blog_id: i64,
    /// Target post.
    pub post_id: i64,
    /// Commenter's login handle.
    pub user_id: String,
    /// Comment text.
    pub content: String,
}
