//! Client-facing shapes of posts and comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blog_entity::content::{Comment, Post, Tag};

/// A comment as shown under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub comment_id: i64,
    pub blog_id: i64,
    pub post_id: i64,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<&Comment> for CommentView {
    fn from(c: &Comment) -> Self {
        Self {
            comment_id: c.id,
            blog_id: c.blog_id,
            post_id: c.post_id,
            user_id: c.user_id.clone(),
            content: c.content.clone(),
            created_at: c.created_at,
            modified_at: c.modified_at,
        }
    }
}

/// A post with its files, tags, and comments.
///
/// This is also the value stored in the popular post cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub post_id: i64,
    pub blog_id: i64,
    pub user_id: String,
    pub nickname: String,
    pub title: String,
    pub content: String,
    pub file_urls: Vec<String>,
    pub tags: Vec<String>,
    pub comments: Vec<CommentView>,
    pub like_count: i32,
    pub comment_count: i32,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    /// Served from the popular post cache.
    pub is_popular: bool,
}

impl PostView {
    /// Assemble a view from a post row and its related rows.
    pub fn assemble(post: &Post, file_urls: Vec<String>, tags: &[Tag], comments: &[Comment]) -> Self {
        Self {
            post_id: post.id,
            blog_id: post.blog_id,
            user_id: post.user_id.clone(),
            nickname: post.nickname.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            file_urls,
            tags: tags.iter().map(|t| t.name.clone()).collect(),
            comments: comments.iter().map(CommentView::from).collect(),
            like_count: post.like_count,
            comment_count: post.comment_count,
            view_count: post.view_count,
            created_at: post.created_at,
            modified_at: post.modified_at,
            is_popular: false,
        }
    }
}

/// One row of a post list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub post_id: i64,
    pub title: String,
    pub user_id: String,
    pub nickname: String,
    pub like_count: i32,
    pub comment_count: i32,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostSummary {
    fn from(p: Post) -> Self {
        Self {
            post_id: p.id,
            title: p.title,
            user_id: p.user_id,
            nickname: p.nickname,
            like_count: p.like_count,
            comment_count: p.comment_count,
            view_count: p.view_count,
            created_at: p.created_at,
        }
    }
}
