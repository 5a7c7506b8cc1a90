//! Post use cases.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use validator::Validate;

use blog_auth::Identity;
use blog_core::error::{AppError, ErrorCode};
use blog_core::result::AppResult;
use blog_core::traits::UploadFile;
use blog_core::types::pagination::{PageResult, SearchParams};
use blog_database::{CommentStore, PostStore, TagStore, UserStore};
use blog_entity::content::{CreatePost, Post};
use blog_entity::content::tag::normalize_tags;
use blog_entity::user::UserRole;
use blog_storage::StorageManager;
use blog_storage::manager::POST_DIRECTORY;

use crate::validation::validate_form;

use super::popular::PopularPostCache;
use super::view::{PostSummary, PostView};

/// Title and body of a post being written or edited.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostForm {
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub title: String,
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub content: String,
}

/// Handles writing, reading, and listing posts.
#[derive(Debug, Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
    tags: Arc<dyn TagStore>,
    users: Arc<dyn UserStore>,
    storage: Arc<StorageManager>,
    popular: PopularPostCache,
}

impl PostService {
    /// Creates a new post service.
    pub fn new(
        posts: Arc<dyn PostStore>,
        comments: Arc<dyn CommentStore>,
        tags: Arc<dyn TagStore>,
        users: Arc<dyn UserStore>,
        storage: Arc<StorageManager>,
        popular: PopularPostCache,
    ) -> Self {
        Self {
            posts,
            comments,
            tags,
            users,
            storage,
            popular,
        }
    }

    /// Write a post on the caller's own blog.
    pub async fn register(
        &self,
        identity: &Identity,
        form: PostForm,
        files: &[UploadFile],
        tags: &[String],
    ) -> AppResult<PostView> {
        identity.require_any(&[UserRole::Admin])?;
        validate_form(&form)?;

        let user = self
            .users
            .find_by_user_id(&identity.user_id)
            .await?
            .filter(|u| !u.is_withdrawn())
            .ok_or_else(|| AppError::coded_with(ErrorCode::NotFoundUser, &identity.user_id))?;
        let blog = self
            .users
            .find_blog_by_user_id(&user.user_id)
            .await?
            .ok_or_else(|| AppError::coded(ErrorCode::ForbiddenAccess))?;

        let file_urls = self.storage.upload_all(files, POST_DIRECTORY).await?;
        let post = self
            .posts
            .create(
                &CreatePost {
                    blog_id: blog.id,
                    user_id: user.user_id.clone(),
                    nickname: user.nickname.clone(),
                    title: form.title,
                    content: form.content,
                },
                &file_urls,
            )
            .await?;
        let tags = self.tags.replace_for_post(post.id, &normalize_tags(tags)).await?;

        info!(post_id = post.id, user_id = %user.user_id, files = file_urls.len(), "Post registered");
        Ok(PostView::assemble(&post, file_urls, &tags, &[]))
    }

    /// Replace the title, body, images, and tags of the caller's post.
    pub async fn update(
        &self,
        identity: &Identity,
        post_id: i64,
        form: PostForm,
        files: &[UploadFile],
        tags: &[String],
    ) -> AppResult<PostView> {
        validate_form(&form)?;
        let post = self.find_live(post_id).await?;
        ensure_writer(&post, identity)?;

        let file_urls = self.storage.upload_all(files, POST_DIRECTORY).await?;
        let post = self
            .posts
            .update(post_id, &form.title, &form.content, &file_urls)
            .await?;
        self.tags.replace_for_post(post_id, &normalize_tags(tags)).await?;

        let view = self.assemble(&post).await?;
        if self.popular.qualifies(post.like_count) {
            self.popular.put(&view).await?;
        }

        info!(post_id, user_id = %identity.user_id, "Post updated");
        Ok(view)
    }

    /// Soft-delete the caller's post along with its comments and files.
    pub async fn delete(&self, identity: &Identity, post_id: i64) -> AppResult<()> {
        let post = self.find_live(post_id).await?;
        ensure_writer(&post, identity)?;

        self.posts.soft_delete(post_id).await?;
        self.popular.evict(post_id).await?;

        info!(post_id, user_id = %identity.user_id, "Post deleted");
        Ok(())
    }

    /// Read a post and count the view. Popular posts are served from cache.
    pub async fn get(&self, post_id: i64) -> AppResult<PostView> {
        match self.popular.get(post_id).await {
            Ok(Some(cached)) => {
                self.posts.increment_view(post_id).await?;
                debug!(post_id, "Popular post cache hit");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!(post_id, error = %e, "Popular post cache unavailable"),
        }

        let post = self.find_live(post_id).await?;
        let mut view = self.assemble(&post).await?;
        self.posts.increment_view(post_id).await?;
        view.view_count += 1;
        Ok(view)
    }

    /// Search live posts, newest first.
    pub async fn search(&self, params: SearchParams) -> AppResult<PageResult<PostSummary>> {
        Ok(self.posts.search(params.normalized()).await?.map(PostSummary::from))
    }

    /// Live posts ordered by like count.
    pub async fn popular(&self, params: SearchParams) -> AppResult<PageResult<PostSummary>> {
        Ok(self.posts.popular(params.normalized()).await?.map(PostSummary::from))
    }

    /// Live posts carrying a tag.
    pub async fn by_tag(
        &self,
        tag_name: &str,
        params: SearchParams,
    ) -> AppResult<PageResult<PostSummary>> {
        Ok(self
            .posts
            .find_by_tag(tag_name.trim(), params.normalized())
            .await?
            .map(PostSummary::from))
    }

    /// Write the post to the popular cache or evict it, per its like count.
    pub async fn sync_popular(&self, post_id: i64, like_count: i32) -> AppResult<()> {
        if !self.popular.qualifies(like_count) {
            return self.popular.evict(post_id).await;
        }
        let post = self.find_live(post_id).await?;
        let view = self.assemble(&post).await?;
        self.popular.put(&view).await?;
        info!(post_id, like_count, "Post became popular");
        Ok(())
    }

    /// A post that has not been deleted.
    pub async fn find_live(&self, post_id: i64) -> AppResult<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::coded(ErrorCode::NotExistPost))
    }

    async fn assemble(&self, post: &Post) -> AppResult<PostView> {
        let files = self.posts.find_files(post.id).await?;
        let tags = self.tags.find_by_post(post.id).await?;
        let comments = self.comments.find_by_post(post.id).await?;
        Ok(PostView::assemble(post, files, &tags, &comments))
    }
}

fn ensure_writer(post: &Post, identity: &Identity) -> AppResult<()> {
    if post.is_written_by(&identity.user_id) {
        Ok(())
    } else {
        Err(AppError::coded(ErrorCode::ForbiddenAccess))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::error::ErrorKind;

    use crate::content::fixture::ContentFixture;

    #[tokio::test]
    async fn test_register_needs_own_blog() {
        let f = ContentFixture::new();
        let form = PostForm {
            title: "t".into(),
            content: "c".into(),
        };

        let err = f
            .posts
            .register(&ContentFixture::member("bob"), form, &[], &[])
            .await
            .unwrap_err();
        assert!(err.is(ErrorCode::ForbiddenAccess));
    }

    #[tokio::test]
    async fn test_blank_form_is_rejected() {
        let f = ContentFixture::new();
        let alice = f.blog_owner("alice").await;
        for (title, content) in [("  ", "body"), ("title", "")] {
            let form = PostForm {
                title: title.into(),
                content: content.into(),
            };
            let err = f.posts.register(&alice, form, &[], &[]).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }
    }

    #[tokio::test]
    async fn test_register_links_tags_and_get_counts_views() {
        let f = ContentFixture::new();
        let alice = f.blog_owner("alice").await;
        let files = [UploadFile {
            file_name: "a.png".into(),
            content_type: Some("image/png".into()),
            data: bytes::Bytes::from_static(b"png"),
        }];

        let view = f
            .posts
            .register(
                &alice,
                PostForm {
                    title: "Hello".into(),
                    content: "World".into(),
                },
                &files,
                &[" rust ".into(), "rust".into(), "axum".into()],
            )
            .await
            .unwrap();
        assert_eq!(view.tags, vec!["rust", "axum"]);
        assert_eq!(view.file_urls, vec!["https://cdn.test/post-image/a.png"]);

        assert_eq!(f.posts.get(view.post_id).await.unwrap().view_count, 1);
        assert_eq!(f.posts.get(view.post_id).await.unwrap().view_count, 2);

        let tagged = f.posts.by_tag("axum", SearchParams::default()).await.unwrap();
        assert_eq!(tagged.list.len(), 1);
    }

    #[tokio::test]
    async fn test_only_writer_may_edit_or_delete() {
        let f = ContentFixture::new();
        let alice = f.blog_owner("alice").await;
        let bob = f.blog_owner("bob").await;
        let post = f.write_post(&alice, "mine").await;

        let form = PostForm {
            title: "taken".into(),
            content: "over".into(),
        };
        let err = f
            .posts
            .update(&bob, post.post_id, form.clone(), &[], &[])
            .await
            .unwrap_err();
        assert!(err.is(ErrorCode::ForbiddenAccess));
        let err = f.posts.delete(&bob, post.post_id).await.unwrap_err();
        assert!(err.is(ErrorCode::ForbiddenAccess));

        let updated = f
            .posts
            .update(&alice, post.post_id, form, &[], &[])
            .await
            .unwrap();
        assert_eq!(updated.title, "taken");
        assert!(updated.tags.is_empty());
    }

    #[tokio::test]
    async fn test_delete_evicts_popular_cache() {
        let f = ContentFixture::new();
        let alice = f.blog_owner("alice").await;
        let post = f.write_post(&alice, "hit").await;
        for reader in ["bob", "carol"] {
            f.likes
                .add(&ContentFixture::member(reader), post.post_id)
                .await
                .unwrap();
        }
        let cached = f.posts.get(post.post_id).await.unwrap();
        assert!(cached.is_popular);

        f.posts.delete(&alice, post.post_id).await.unwrap();

        assert!(f.popular.get(post.post_id).await.unwrap().is_none());
        let err = f.posts.get(post.post_id).await.unwrap_err();
        assert!(err.is(ErrorCode::NotExistPost));
    }
}
