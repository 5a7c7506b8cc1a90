//! Post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Post identifier.
    pub id: i64,
    /// Blog the post belongs to.
    pub blog_id: i64,
    /// Writer's login handle.
    pub user_id: String,
    /// Writer's nickname at the time of writing.
    pub nickname: String,
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
    /// Number of likes.
    pub like_count: i32,
    /// Number of live comments.
    pub comment_count: i32,
    /// Number of reads.
    pub view_count: i32,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// Last edit.
    pub modified_at: Option<DateTime<Utc>>,
    /// Set when the post is deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Whether `user_id` wrote this post.
    pub fn is_written_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Data required to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePost {
    /// Target blog.
    pub blog_id: i64,
    /// Writer's login handle.
    pub user_id: String,
    /// Writer's nickname.
    pub nickname: String,
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
}
