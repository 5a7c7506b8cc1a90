//! Content services wired over in-memory stores, for unit tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use blog_auth::Identity;
use blog_cache::CacheManager;
use blog_core::config::RealtimeConfig;
use blog_core::result::AppResult;
use blog_core::traits::{ObjectStorage, UploadFile};
use blog_core::types::pagination::SearchParams;
use blog_database::memory::{MemoryContentStore, MemoryNotificationStore, MemoryUserStore};
use blog_database::{NotificationStore, UserStore};
use blog_entity::notification::Notification;
use blog_entity::user::{CreateUser, UserRole};
use blog_realtime::RealtimeEngine;
use blog_storage::StorageManager;

use super::{CommentService, LikeService, PopularPostCache, PostForm, PostService, PostView};

/// Like count at which fixture posts become popular.
pub const POPULAR_THRESHOLD: i32 = 2;

#[derive(Debug)]
struct EchoStorage;

#[async_trait]
impl ObjectStorage for EchoStorage {
    fn provider_type(&self) -> &str {
        "echo"
    }

    async fn upload(&self, file: &UploadFile, directory: &str) -> AppResult<String> {
        Ok(format!("https://cdn.test/{directory}/{}", file.file_name))
    }
}

pub struct ContentFixture {
    pub posts: Arc<PostService>,
    pub comments: CommentService,
    pub likes: LikeService,
    pub popular: PopularPostCache,
    pub users: Arc<MemoryUserStore>,
    pub notifications: Arc<MemoryNotificationStore>,
    _realtime: RealtimeEngine,
}

impl ContentFixture {
    pub fn new() -> Self {
        let content = Arc::new(MemoryContentStore::new());
        let users = Arc::new(MemoryUserStore::new());
        let notifications = Arc::new(MemoryNotificationStore::new());
        let realtime = RealtimeEngine::new(&RealtimeConfig::default(), notifications.clone());
        let popular = PopularPostCache::new(
            CacheManager::in_memory(),
            POPULAR_THRESHOLD,
            Duration::from_secs(60),
        );
        let storage = Arc::new(StorageManager::from_provider(
            Arc::new(EchoStorage),
            "https://cdn.test/default.png",
        ));

        let posts = Arc::new(PostService::new(
            content.clone(),
            content.clone(),
            content.clone(),
            users.clone(),
            storage,
            popular.clone(),
        ));
        let comments = CommentService::new(
            content.clone(),
            posts.clone(),
            realtime.dispatcher.clone(),
        );
        let likes = LikeService::new(content, posts.clone());

        Self {
            posts,
            comments,
            likes,
            popular,
            users,
            notifications,
            _realtime: realtime,
        }
    }

    /// Register a user with a blog and return them as its admin.
    pub async fn blog_owner(&self, user_id: &str) -> Identity {
        self.users
            .register(&CreateUser {
                user_id: user_id.into(),
                password_hash: "hash".into(),
                email: format!("{user_id}@example.com"),
                user_name: "홍길동".into(),
                nickname: format!("{user_id}nick"),
                phone_number: None,
                profile_image_url: "https://cdn.test/default.png".into(),
            })
            .await
            .unwrap();
        Identity::new(user_id, vec![UserRole::Admin])
    }

    /// A signed-in reader without a blog.
    pub fn member(user_id: &str) -> Identity {
        Identity::new(user_id, vec![UserRole::Member])
    }

    /// Write a post with one tag on the owner's blog.
    pub async fn write_post(&self, owner: &Identity, title: &str) -> PostView {
        self.posts
            .register(
                owner,
                PostForm {
                    title: title.into(),
                    content: "body".into(),
                },
                &[],
                &["rust".into()],
            )
            .await
            .unwrap()
    }

    /// Wait for dispatch workers to persist `count` notifications for a user.
    pub async fn notifications_for(&self, user_id: &str, count: usize) -> Vec<Notification> {
        for _ in 0..100 {
            let page = self
                .notifications
                .find_by_user(user_id, SearchParams::default())
                .await
                .unwrap();
            if page.list.len() >= count {
                return page.list;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {count} notifications for {user_id}");
    }
}
