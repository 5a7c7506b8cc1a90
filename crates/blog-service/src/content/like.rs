//! Like use cases.

use std::sync::Arc;

use tracing::info;

use blog_auth::Identity;
use blog_core::error::{AppError, ErrorCode};
use blog_core::result::AppResult;
use blog_database::LikeStore;

use super::post::PostService;

/// Handles liking and unliking posts.
#[derive(Debug, Clone)]
pub struct LikeService {
    likes: Arc<dyn LikeStore>,
    posts: Arc<PostService>,
}

impl LikeService {
    /// Creates a new like service.
    pub fn new(likes: Arc<dyn LikeStore>, posts: Arc<PostService>) -> Self {
        Self { likes, posts }
    }

    /// Like a post. Returns the new like count.
    pub async fn add(&self, identity: &Identity, post_id: i64) -> AppResult<i32> {
        self.posts.find_live(post_id).await?;
        let count = self
            .likes
            .add(&identity.user_id, post_id)
            .await?
            .ok_or_else(|| AppError::coded(ErrorCode::PostLikeFail))?;

        self.posts.sync_popular(post_id, count).await?;
        info!(post_id, user_id = %identity.user_id, like_count = count, "Post liked");
        Ok(count)
    }

    /// Withdraw a like. Returns the new like count.
    pub async fn remove(&self, identity: &Identity, post_id: i64) -> AppResult<i32> {
        self.posts.find_live(post_id).await?;
        let count = self
            .likes
            .remove(&identity.user_id, post_id)
            .await?
            .ok_or_else(|| AppError::coded(ErrorCode::PostDeleteLikeFail))?;

        self.posts.sync_popular(post_id, count).await?;
        info!(post_id, user_id = %identity.user_id, like_count = count, "Post unliked");
        Ok(count)
    }
}
