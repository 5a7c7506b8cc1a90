//! In-process implementations of the store traits.
//!
//! Used by tests and by local runs that have no PostgreSQL at hand. Data lives
//! only as long as the store value.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, DashSet};

use blog_core::error::{AppError, ErrorCode};
use blog_core::result::AppResult;
use blog_core::types::pagination::{PageResult, Pagination, SearchParams, SearchType};
use blog_entity::content::{Comment, CreateComment, CreatePost, Post, Tag};
use blog_entity::notification::{NewNotification, Notification};
use blog_entity::user::{Blog, BlogUser, CreateUser};

use crate::repositories::PostOrder;
use crate::store::{CommentStore, LikeStore, NotificationStore, PostStore, TagStore, UserStore};

/// Cut one page out of already ordered rows.
fn paginate<T>(rows: Vec<T>, mut params: SearchParams) -> PageResult<T> {
    if rows.is_empty() {
        return PageResult::empty();
    }
    let pagination = Pagination::new(rows.len() as i64, &mut params);
    let list = rows
        .into_iter()
        .skip(pagination.limit_start as usize)
        .take(params.record_size as usize)
        .collect();
    PageResult {
        list,
        pagination: Some(pagination),
    }
}

// ── Users ────────────────────────────────────────────────────────────

/// [`UserStore`] backed by concurrent maps.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<String, BlogUser>,
    blogs: DashMap<String, Blog>,
    next_id: AtomicI64,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<BlogUser>> {
        Ok(self.users.get(user_id).map(|u| u.clone()))
    }

    async fn exists_by_user_id(&self, user_id: &str) -> AppResult<bool> {
        Ok(self.users.contains_key(user_id))
    }

    async fn exists_by_nickname(&self, nickname: &str) -> AppResult<bool> {
        Ok(self.users.iter().any(|u| u.nickname == nickname))
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self.users.iter().any(|u| u.email == email))
    }

    async fn register(&self, user: &CreateUser) -> AppResult<(BlogUser, Blog)> {
        let now = Utc::now();
        let created = BlogUser {
            id: self.next_id(),
            user_id: user.user_id.clone(),
            password_hash: user.password_hash.clone(),
            email: user.email.clone(),
            user_name: user.user_name.clone(),
            nickname: user.nickname.clone(),
            phone_number: user.phone_number.clone(),
            profile_image_url: user.profile_image_url.clone(),
            created_at: now,
            updated_at: None,
            deleted_at: None,
        };

        match self.users.entry(user.user_id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => return Err(ErrorCode::DuplicateUserId.into()),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(created.clone());
            }
        }

        let blog = Blog {
            id: self.next_id(),
            user_id: user.user_id.clone(),
            created_at: now,
            deleted_at: None,
        };
        self.blogs.insert(user.user_id.clone(), blog.clone());
        Ok((created, blog))
    }

    async fn find_blog_by_user_id(&self, user_id: &str) -> AppResult<Option<Blog>> {
        Ok(self
            .blogs
            .get(user_id)
            .filter(|b| b.deleted_at.is_none())
            .map(|b| b.clone()))
    }

    async fn find_blog_by_id(&self, blog_id: i64) -> AppResult<Option<Blog>> {
        Ok(self
            .blogs
            .iter()
            .find(|b| b.id == blog_id && b.deleted_at.is_none())
            .map(|b| b.clone()))
    }

    async fn withdraw(&self, user_id: &str) -> AppResult<()> {
        let now = Utc::now();
        let mut user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| AppError::coded(ErrorCode::NotFoundUser))?;
        user.deleted_at = Some(now);
        user.updated_at = Some(now);
        drop(user);

        if let Some(mut blog) = self.blogs.get_mut(user_id) {
            blog.deleted_at = Some(now);
        }
        Ok(())
    }
}

// ── Notifications ────────────────────────────────────────────────────

/// [`NotificationStore`] backed by a concurrent map.
///
/// Counts every mutating write so callers can assert how many writes an
/// operation performed.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    rows: DashMap<i64, Notification>,
    next_id: AtomicI64,
    writes: AtomicU64,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of inserts and updates performed so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn sorted_for(&self, user_id: &str) -> Vec<Notification> {
        let mut rows: Vec<Notification> = self
            .rows
            .iter()
            .filter(|n| n.user_id == user_id)
            .map(|n| n.clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn create(&self, notification: &NewNotification) -> AppResult<Notification> {
        let row = Notification {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id: notification.user_id.clone(),
            notification_type: notification.notification_type,
            content: notification.content.clone(),
            url: notification.url.clone(),
            is_read: false,
            created_at: Utc::now(),
        };
        self.rows.insert(row.id, row.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Notification>> {
        Ok(self.rows.get(&id).map(|n| n.clone()))
    }

    async fn mark_read(&self, id: i64) -> AppResult<bool> {
        let Some(mut row) = self.rows.get_mut(&id) else {
            return Ok(false);
        };
        if row.is_read {
            return Ok(false);
        }
        row.is_read = true;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        params: SearchParams,
    ) -> AppResult<PageResult<Notification>> {
        Ok(paginate(self.sorted_for(user_id), params))
    }

    async fn count_unread(&self, user_id: &str) -> AppResult<i64> {
        Ok(self
            .rows
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as i64)
    }
}

// ── Content ──────────────────────────────────────────────────────────

/// [`PostStore`], [`CommentStore`], [`LikeStore`] and [`TagStore`] over one
/// set of tables, so counters stay consistent across them.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    posts: DashMap<i64, Post>,
    files: DashMap<i64, Vec<String>>,
    comments: DashMap<i64, Comment>,
    likes: DashSet<(String, i64)>,
    tags: DashMap<String, Tag>,
    post_tags: DashMap<i64, Vec<i64>>,
    next_id: AtomicI64,
}

impl MemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn list(
        &self,
        params: SearchParams,
        tag_name: Option<&str>,
        order: PostOrder,
    ) -> PageResult<Post> {
        let tag_id = match tag_name {
            Some(name) => match self.tags.get(name) {
                Some(tag) => Some(tag.id),
                None => return PageResult::empty(),
            },
            None => None,
        };

        let mut rows: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| p.deleted_at.is_none())
            .filter(|p| {
                tag_id.is_none_or(|t| self.post_tags.get(&p.id).is_some_and(|ids| ids.contains(&t)))
            })
            .filter(|p| matches_keyword(p, &params))
            .map(|p| p.clone())
            .collect();

        match order {
            PostOrder::Latest => rows.sort_by(|a, b| b.id.cmp(&a.id)),
            PostOrder::Popular => {
                rows.sort_by(|a, b| b.like_count.cmp(&a.like_count).then(b.id.cmp(&a.id)))
            }
        }
        paginate(rows, params)
    }
}

fn matches_keyword(post: &Post, params: &SearchParams) -> bool {
    let Some(keyword) = params.keyword.as_deref() else {
        return true;
    };
    let keyword = keyword.to_lowercase();
    let hit = |field: &str| field.to_lowercase().contains(&keyword);
    match params.search_type {
        Some(SearchType::Title) => hit(&post.title),
        Some(SearchType::Content) => hit(&post.content),
        Some(SearchType::Writer) => hit(&post.nickname),
        None => hit(&post.title) || hit(&post.content),
    }
}

#[async_trait]
impl PostStore for MemoryContentStore {
    async fn create(&self, data: &CreatePost, file_urls: &[String]) -> AppResult<Post> {
        let post = Post {
            id: self.next_id(),
            blog_id: data.blog_id,
            user_id: data.user_id.clone(),
            nickname: data.nickname.clone(),
            title: data.title.clone(),
            content: data.content.clone(),
            like_count: 0,
            comment_count: 0,
            view_count: 0,
            created_at: Utc::now(),
            modified_at: None,
            deleted_at: None,
        };
        self.posts.insert(post.id, post.clone());
        self.files.insert(post.id, file_urls.to_vec());
        Ok(post)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Post>> {
        Ok(self
            .posts
            .get(&id)
            .filter(|p| p.deleted_at.is_none())
            .map(|p| p.clone()))
    }

    async fn update(
        &self,
        id: i64,
        title: &str,
        content: &str,
        file_urls: &[String],
    ) -> AppResult<Post> {
        let mut post = self
            .posts
            .get_mut(&id)
            .filter(|p| p.deleted_at.is_none())
            .ok_or_else(|| AppError::not_found(format!("Post {id} not found")))?;
        post.title = title.to_string();
        post.content = content.to_string();
        post.modified_at = Some(Utc::now());
        let updated = post.clone();
        drop(post);

        self.files.insert(id, file_urls.to_vec());
        Ok(updated)
    }

    async fn soft_delete(&self, id: i64) -> AppResult<()> {
        self.comments.retain(|_, c| c.post_id != id);
        self.files.remove(&id);
        self.post_tags.remove(&id);
        if let Some(mut post) = self.posts.get_mut(&id) {
            post.deleted_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn find_files(&self, post_id: i64) -> AppResult<Vec<String>> {
        Ok(self.files.get(&post_id).map(|f| f.clone()).unwrap_or_default())
    }

    async fn increment_view(&self, id: i64) -> AppResult<()> {
        if let Some(mut post) = self.posts.get_mut(&id) {
            post.view_count += 1;
        }
        Ok(())
    }

    async fn search(&self, params: SearchParams) -> AppResult<PageResult<Post>> {
        Ok(self.list(params, None, PostOrder::Latest))
    }

    async fn popular(&self, params: SearchParams) -> AppResult<PageResult<Post>> {
        Ok(self.list(params, None, PostOrder::Popular))
    }

    async fn find_by_tag(
        &self,
        tag_name: &str,
        params: SearchParams,
    ) -> AppResult<PageResult<Post>> {
        Ok(self.list(params, Some(tag_name), PostOrder::Latest))
    }
}

#[async_trait]
impl CommentStore for MemoryContentStore {
    async fn create(&self, data: &CreateComment) -> AppResult<Comment> {
        let comment = Comment {
            id: self.next_id(),
            blog_id: data.blog_id,
            post_id: data.post_id,
            user_id: data.user_id.clone(),
            content: data.content.clone(),
            created_at: Utc::now(),
            modified_at: None,
        };
        self.comments.insert(comment.id, comment.clone());
        if let Some(mut post) = self.posts.get_mut(&data.post_id) {
            post.comment_count += 1;
        }
        Ok(comment)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Comment>> {
        Ok(self.comments.get(&id).map(|c| c.clone()))
    }

    async fn find_by_post(&self, post_id: i64) -> AppResult<Vec<Comment>> {
        let mut rows: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| c.clone())
            .collect();
        rows.sort_by_key(|c| c.id);
        Ok(rows)
    }

    async fn update(&self, id: i64, content: &str) -> AppResult<Comment> {
        let mut comment = self
            .comments
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Comment {id} not found")))?;
        comment.content = content.to_string();
        comment.modified_at = Some(Utc::now());
        Ok(comment.clone())
    }

    async fn delete(&self, comment: &Comment) -> AppResult<()> {
        if self.comments.remove(&comment.id).is_none() {
            return Ok(());
        }
        if let Some(mut post) = self.posts.get_mut(&comment.post_id) {
            post.comment_count = (post.comment_count - 1).max(0);
        }
        Ok(())
    }
}

#[async_trait]
impl LikeStore for MemoryContentStore {
    async fn add(&self, user_id: &str, post_id: i64) -> AppResult<Option<i32>> {
        let mut post = self
            .posts
            .get_mut(&post_id)
            .ok_or_else(|| AppError::not_found(format!("Post {post_id} not found")))?;
        if !self.likes.insert((user_id.to_string(), post_id)) {
            return Ok(None);
        }
        post.like_count += 1;
        Ok(Some(post.like_count))
    }

    async fn remove(&self, user_id: &str, post_id: i64) -> AppResult<Option<i32>> {
        let mut post = self
            .posts
            .get_mut(&post_id)
            .ok_or_else(|| AppError::not_found(format!("Post {post_id} not found")))?;
        if self.likes.remove(&(user_id.to_string(), post_id)).is_none() {
            return Ok(None);
        }
        post.like_count = (post.like_count - 1).max(0);
        Ok(Some(post.like_count))
    }
}

#[async_trait]
impl TagStore for MemoryContentStore {
    async fn replace_for_post(&self, post_id: i64, names: &[String]) -> AppResult<Vec<Tag>> {
        let tags: Vec<Tag> = names
            .iter()
            .map(|name| {
                self.tags
                    .entry(name.clone())
                    .or_insert_with(|| Tag {
                        id: self.next_id(),
                        name: name.clone(),
                    })
                    .clone()
            })
            .collect();
        self.post_tags
            .insert(post_id, tags.iter().map(|t| t.id).collect());
        Ok(tags)
    }

    async fn find_by_post(&self, post_id: i64) -> AppResult<Vec<Tag>> {
        let Some(ids) = self.post_tags.get(&post_id).map(|ids| ids.clone()) else {
            return Ok(Vec::new());
        };
        let mut tags: Vec<Tag> = self
            .tags
            .iter()
            .filter(|t| ids.contains(&t.id))
            .map(|t| t.clone())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_entity::notification::NotificationType;

    fn new_user(user_id: &str) -> CreateUser {
        CreateUser {
            user_id: user_id.into(),
            password_hash: "hash".into(),
            email: format!("{user_id}@example.com"),
            user_name: "Name".into(),
            nickname: format!("nick-{user_id}"),
            phone_number: None,
            profile_image_url: "/default.png".into(),
        }
    }

    fn comment_for(user_id: &str) -> NewNotification {
        NewNotification {
            user_id: user_id.into(),
            notification_type: NotificationType::Comment,
            content: "new comment".into(),
            url: "/post/1".into(),
        }
    }

    #[tokio::test]
    async fn test_register_creates_blog() {
        let store = MemoryUserStore::new();
        let (user, blog) = store.register(&new_user("alice")).await.unwrap();
        assert_eq!(blog.user_id, user.user_id);
        assert!(store.exists_by_email("alice@example.com").await.unwrap());
        assert!(store.exists_by_nickname("nick-alice").await.unwrap());
        assert_eq!(
            store.find_blog_by_id(blog.id).await.unwrap().unwrap().user_id,
            "alice"
        );
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_user_id() {
        let store = MemoryUserStore::new();
        store.register(&new_user("alice")).await.unwrap();
        let err = store.register(&new_user("alice")).await.unwrap_err();
        assert!(err.is(ErrorCode::DuplicateUserId));
    }

    #[tokio::test]
    async fn test_withdraw_soft_deletes() {
        let store = MemoryUserStore::new();
        store.register(&new_user("bob")).await.unwrap();
        store.withdraw("bob").await.unwrap();
        let user = store.find_by_user_id("bob").await.unwrap().unwrap();
        assert!(user.is_withdrawn());
        assert!(store.find_blog_by_user_id("bob").await.unwrap().is_none());
        assert!(store.exists_by_user_id("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_read_writes_once() {
        let store = MemoryNotificationStore::new();
        let row = store.create(&comment_for("alice")).await.unwrap();
        assert_eq!(store.write_count(), 1);

        assert!(store.mark_read(row.id).await.unwrap());
        assert!(!store.mark_read(row.id).await.unwrap());
        assert_eq!(store.write_count(), 2);
        assert!(store.find_by_id(row.id).await.unwrap().unwrap().is_read);
    }

    #[tokio::test]
    async fn test_list_and_unread_count() {
        let store = MemoryNotificationStore::new();
        for _ in 0..3 {
            store.create(&comment_for("alice")).await.unwrap();
        }
        store.create(&comment_for("carol")).await.unwrap();
        store.mark_read(1).await.unwrap();

        assert_eq!(store.count_unread("alice").await.unwrap(), 2);

        let page = store
            .find_by_user(
                "alice",
                SearchParams {
                    record_size: 2,
                    ..SearchParams::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.list.len(), 2);
        assert_eq!(page.list[0].id, 3);
        assert_eq!(page.pagination.unwrap().total_page_count, 2);

        let empty = store
            .find_by_user("nobody", SearchParams::default())
            .await
            .unwrap();
        assert!(empty.list.is_empty());
        assert!(empty.pagination.is_none());
    }

    fn new_post(user_id: &str, title: &str) -> CreatePost {
        CreatePost {
            blog_id: 1,
            user_id: user_id.into(),
            nickname: format!("nick-{user_id}"),
            title: title.into(),
            content: "body".into(),
        }
    }

    #[tokio::test]
    async fn test_comments_and_likes_move_post_counters() {
        let store = MemoryContentStore::new();
        let post = PostStore::create(&store, &new_post("alice", "hello"), &[]).await.unwrap();

        let comment = CommentStore::create(
            &store,
            &CreateComment {
                blog_id: 1,
                post_id: post.id,
                user_id: "bob".into(),
                content: "hi".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(store.add("bob", post.id).await.unwrap(), Some(1));
        assert_eq!(store.add("bob", post.id).await.unwrap(), None);

        let reloaded = PostStore::find_by_id(&store, post.id).await.unwrap().unwrap();
        assert_eq!((reloaded.comment_count, reloaded.like_count), (1, 1));

        CommentStore::delete(&store, &comment).await.unwrap();
        assert_eq!(store.remove("bob", post.id).await.unwrap(), Some(0));
        assert_eq!(store.remove("bob", post.id).await.unwrap(), None);
        let reloaded = PostStore::find_by_id(&store, post.id).await.unwrap().unwrap();
        assert_eq!((reloaded.comment_count, reloaded.like_count), (0, 0));
    }

    #[tokio::test]
    async fn test_search_tag_and_popular_listings() {
        let store = MemoryContentStore::new();
        let rust = PostStore::create(&store, &new_post("alice", "Learning Rust"), &[]).await.unwrap();
        let axum = PostStore::create(&store, &new_post("bob", "Axum routing"), &[]).await.unwrap();
        store.replace_for_post(rust.id, &["rust".into()]).await.unwrap();
        store.add("carol", axum.id).await.unwrap();

        let params = SearchParams {
            keyword: Some("rust".into()),
            ..SearchParams::default()
        };
        let found = store.search(params).await.unwrap();
        assert_eq!(found.list.len(), 1);
        assert_eq!(found.list[0].id, rust.id);

        let tagged = store.find_by_tag("rust", SearchParams::default()).await.unwrap();
        assert_eq!(tagged.list[0].id, rust.id);
        assert!(store.find_by_tag("go", SearchParams::default()).await.unwrap().list.is_empty());

        let popular = store.popular(SearchParams::default()).await.unwrap();
        assert_eq!(popular.list[0].id, axum.id);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_post_and_drops_children() {
        let store = MemoryContentStore::new();
        let post = PostStore::create(&store, &new_post("alice", "t"), &["https://cdn.test/a.png".into()])
            .await
            .unwrap();
        store.replace_for_post(post.id, &["rust".into()]).await.unwrap();

        store.soft_delete(post.id).await.unwrap();

        assert!(PostStore::find_by_id(&store, post.id).await.unwrap().is_none());
        assert!(store.find_files(post.id).await.unwrap().is_empty());
        assert!(TagStore::find_by_post(&store, post.id).await.unwrap().is_empty());
        assert!(store.search(SearchParams::default()).await.unwrap().list.is_empty());
    }
}
