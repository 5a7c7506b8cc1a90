//! Store traits consumed by the authentication gate, the notification core,
//! and the content services.
//!
//! The sqlx repositories implement these for PostgreSQL; [`crate::memory`]
//! implements them in-process.

use async_trait::async_trait;

use blog_core::result::AppResult;
use blog_core::types::pagination::{PageResult, SearchParams};
use blog_entity::content::{Comment, CreateComment, CreatePost, Post, Tag};
use blog_entity::notification::{NewNotification, Notification};
use blog_entity::user::{Blog, BlogUser, CreateUser};

/// Identity store: users and the blog each one owns.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by login handle, including withdrawn users.
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<BlogUser>>;

    /// Whether any user (active or withdrawn) holds this login handle.
    async fn exists_by_user_id(&self, user_id: &str) -> AppResult<bool>;

    /// Whether any user holds this nickname.
    async fn exists_by_nickname(&self, nickname: &str) -> AppResult<bool>;

    /// Whether any user holds this email.
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Persist a user together with their blog, atomically.
    async fn register(&self, user: &CreateUser) -> AppResult<(BlogUser, Blog)>;

    /// Find the blog owned by a user.
    async fn find_blog_by_user_id(&self, user_id: &str) -> AppResult<Option<Blog>>;

    /// Find a blog by id.
    async fn find_blog_by_id(&self, blog_id: i64) -> AppResult<Option<Blog>>;

    /// Soft-delete a user and their blog, atomically.
    async fn withdraw(&self, user_id: &str) -> AppResult<()>;
}

/// Notification persistence.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new unread notification.
    async fn create(&self, notification: &NewNotification) -> AppResult<Notification>;

    /// Find a notification by id.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Notification>>;

    /// Flip an unread notification to read.
    ///
    /// Returns `false` when nothing changed (already read or missing).
    async fn mark_read(&self, id: i64) -> AppResult<bool>;

    /// List a user's notifications, newest first.
    async fn find_by_user(
        &self,
        user_id: &str,
        params: SearchParams,
    ) -> AppResult<PageResult<Notification>>;

    /// Count a user's unread notifications.
    async fn count_unread(&self, user_id: &str) -> AppResult<i64>;
}

/// Posts and their image rows.
#[async_trait]
pub trait PostStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create a post together with its image URLs.
    async fn create(&self, data: &CreatePost, file_urls: &[String]) -> AppResult<Post>;

    /// Find a live post by id.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Post>>;

    /// Replace title, body and images of a live post.
    async fn update(
        &self,
        id: i64,
        title: &str,
        content: &str,
        file_urls: &[String],
    ) -> AppResult<Post>;

    /// Soft-delete a post and remove its comments, images and tag links.
    async fn soft_delete(&self, id: i64) -> AppResult<()>;

    /// Image URLs of a post in upload order.
    async fn find_files(&self, post_id: i64) -> AppResult<Vec<String>>;

    /// Increment the view counter.
    async fn increment_view(&self, id: i64) -> AppResult<()>;

    /// Search live posts, newest first.
    async fn search(&self, params: SearchParams) -> AppResult<PageResult<Post>>;

    /// Live posts ordered by like count, newest among ties.
    async fn popular(&self, params: SearchParams) -> AppResult<PageResult<Post>>;

    /// Live posts carrying a tag, newest first.
    async fn find_by_tag(&self, tag_name: &str, params: SearchParams)
    -> AppResult<PageResult<Post>>;
}

/// Comments. Creating or deleting one adjusts the post's comment count in
/// the same write.
#[async_trait]
pub trait CommentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a comment and bump the post's comment count.
    async fn create(&self, data: &CreateComment) -> AppResult<Comment>;

    /// Find a comment by id.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Comment>>;

    /// Comments on a post, oldest first.
    async fn find_by_post(&self, post_id: i64) -> AppResult<Vec<Comment>>;

    /// Replace a comment's text.
    async fn update(&self, id: i64, content: &str) -> AppResult<Comment>;

    /// Delete a comment and decrement the post's comment count.
    async fn delete(&self, comment: &Comment) -> AppResult<()>;
}

/// Likes. Both operations return the post's new like count, or `None` when
/// nothing changed.
#[async_trait]
pub trait LikeStore: Send + Sync + std::fmt::Debug + 'static {
    /// Record a like; `None` when the user already liked the post.
    async fn add(&self, user_id: &str, post_id: i64) -> AppResult<Option<i32>>;

    /// Remove a like; `None` when there was no like to remove.
    async fn remove(&self, user_id: &str, post_id: i64) -> AppResult<Option<i32>>;
}

/// Tags and post-tag links.
#[async_trait]
pub trait TagStore: Send + Sync + std::fmt::Debug + 'static {
    /// Replace the tags linked to a post, creating unknown tag names.
    async fn replace_for_post(&self, post_id: i64, names: &[String]) -> AppResult<Vec<Tag>>;

    /// Tags linked to a post, by name.
    async fn find_by_post(&self, post_id: i64) -> AppResult<Vec<Tag>>;
}
