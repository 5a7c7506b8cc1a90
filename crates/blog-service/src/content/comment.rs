//! Comment use cases. A new comment notifies the post's writer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use blog_auth::Identity;
use blog_core::error::{AppError, ErrorCode};
use blog_core::result::AppResult;
use blog_database::CommentStore;
use blog_entity::content::{Comment, CreateComment};
use blog_entity::notification::{NewNotification, NotificationType};
use blog_entity::user::UserRole;
use blog_realtime::NotificationDispatcher;

use crate::validation::validate_form;

use super::post::PostService;
use super::view::CommentView;

/// Body of a comment being written or edited.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub content: String,
}

/// Handles writing and editing comments.
#[derive(Debug, Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentStore>,
    posts: Arc<PostService>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl CommentService {
    /// Creates a new comment service.
    pub fn new(
        comments: Arc<dyn CommentStore>,
        posts: Arc<PostService>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            comments,
            posts,
            dispatcher,
        }
    }

    /// Comment on a post and notify its writer.
    pub async fn register(
        &self,
        identity: &Identity,
        blog_id: i64,
        post_id: i64,
        form: CommentForm,
    ) -> AppResult<CommentView> {
        identity.require_any(&[UserRole::Admin, UserRole::Member])?;
        validate_form(&form)?;

        let post = self.posts.find_live(post_id).await?;
        if post.blog_id != blog_id {
            return Err(AppError::coded_with(
                ErrorCode::NotExistPost,
                format!("post {post_id} is not on blog {blog_id}"),
            ));
        }

        let comment = self
            .comments
            .create(&CreateComment {
                blog_id,
                post_id,
                user_id: identity.user_id.clone(),
                content: form.content.trim().to_string(),
            })
            .await?;
        info!(comment_id = comment.id, post_id, user_id = %identity.user_id, "Comment registered");

        if let Some(notification) = comment_notification(&comment, &post.user_id) {
            let outcome = self.dispatcher.submit(notification);
            debug!(comment_id = comment.id, outcome = ?outcome, "Comment notification submitted");
        }

        Ok(CommentView::from(&comment))
    }

    /// Edit the caller's comment.
    pub async fn update(
        &self,
        identity: &Identity,
        comment_id: i64,
        form: CommentForm,
    ) -> AppResult<CommentView> {
        validate_form(&form)?;
        let comment = self.find_own(identity, comment_id).await?;
        let updated = self.comments.update(comment.id, form.content.trim()).await?;
        info!(comment_id, user_id = %identity.user_id, "Comment updated");
        Ok(CommentView::from(&updated))
    }

    /// Delete the caller's comment.
    pub async fn delete(&self, identity: &Identity, comment_id: i64) -> AppResult<()> {
        let comment = self.find_own(identity, comment_id).await?;
        self.comments.delete(&comment).await?;
        info!(comment_id, user_id = %identity.user_id, "Comment deleted");
        Ok(())
    }

    async fn find_own(&self, identity: &Identity, comment_id: i64) -> AppResult<Comment> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::coded(ErrorCode::NotExistComment))?;
        if !comment.is_written_by(&identity.user_id) {
            return Err(AppError::coded(ErrorCode::ForbiddenAccess));
        }
        Ok(comment)
    }
}

/// The notification a comment sends to the post writer. Writers commenting
/// on their own post are not notified.
fn comment_notification(comment: &Comment, post_writer: &str) -> Option<NewNotification> {
    if comment.user_id == post_writer {
        return None;
    }
    Some(NewNotification {
        user_id: post_writer.to_string(),
        notification_type: NotificationType::Comment,
        content: comment.content.clone(),
        url: format!("/post/{}", comment.post_id),
    })
}
