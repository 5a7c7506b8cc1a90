//! Shared test helpers for integration tests.
//!
//! The app runs over in-memory stores, the in-memory cache, and a lazily
//! connected pool that is never touched by these tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use blog_api::{AppState, Infrastructure, build_app, build_state};
use blog_auth::PasswordHasher;
use blog_cache::CacheManager;
use blog_core::config::AppConfig;
use blog_core::result::AppResult;
use blog_core::traits::{MailSender, ObjectStorage, OutgoingMail, UploadFile};
use blog_database::memory::{MemoryContentStore, MemoryNotificationStore, MemoryUserStore};
use blog_database::{DatabasePool, UserStore};
use blog_entity::user::CreateUser;
use blog_storage::StorageManager;

pub const DEFAULT_PROFILE: &str = "https://cdn.test/default.png";

/// Records every mail instead of sending it.
#[derive(Debug, Default)]
pub struct CapturingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl CapturingMailer {
    /// The code in the last mail sent to `email`.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        sent.iter()
            .rev()
            .find(|m| m.to == email)
            .and_then(|m| m.body.rsplit(' ').next().map(str::to_string))
    }
}

#[async_trait]
impl MailSender for CapturingMailer {
    async fn send(&self, mail: &OutgoingMail) -> AppResult<()> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

/// Accepts every upload and returns a predictable URL.
#[derive(Debug, Default)]
pub struct FakeStorage;

#[async_trait]
impl ObjectStorage for FakeStorage {
    fn provider_type(&self) -> &str {
        "fake"
    }

    async fn upload(&self, file: &UploadFile, directory: &str) -> AppResult<String> {
        Ok(format!("https://cdn.test/{directory}/{}", file.file_name))
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for reaching the realtime engine directly
    pub state: AppState,
    pub users: Arc<MemoryUserStore>,
    pub notifications: Arc<MemoryNotificationStore>,
    pub content: Arc<MemoryContentStore>,
    pub mailer: Arc<CapturingMailer>,
}

/// Result of a test request
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Every `Set-Cookie` header value.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// Value of the refresh cookie set by this response, if any.
    pub fn refresh_cookie(&self) -> Option<String> {
        self.set_cookies().into_iter().find_map(|c| {
            let pair = c.split(';').next()?.trim().to_string();
            let value = pair.strip_prefix("REFRESH=")?;
            (!value.is_empty()).then(|| value.to_string())
        })
    }

    /// Whether this response clears the refresh cookie.
    pub fn clears_refresh_cookie(&self) -> bool {
        self.set_cookies()
            .iter()
            .any(|c| c.starts_with("REFRESH=") && c.contains("Max-Age=0"))
    }

    /// The bare access token from the `Authorization` header, if any.
    pub fn access_token(&self) -> Option<String> {
        self.headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string)
    }

    /// The `code` field of an error body.
    pub fn error_code(&self) -> Option<&str> {
        self.body.get("code").and_then(Value::as_str)
    }
}

/// Credentials attached to a test request.
#[derive(Default, Clone, Copy)]
pub struct Credentials<'a> {
    pub access: Option<&'a str>,
    pub refresh: Option<&'a str>,
}

impl<'a> Credentials<'a> {
    pub fn access(token: &'a str) -> Self {
        Self {
            access: Some(token),
            refresh: None,
        }
    }

    pub fn refresh(token: &'a str) -> Self {
        Self {
            access: None,
            refresh: Some(token),
        }
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.min_connections = 0;
    config.database.connect_timeout_seconds = 1;
    config.storage.default_profile_image_url = DEFAULT_PROFILE.to_string();
    config.logging.level = "warn".to_string();
    config
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let db = DatabasePool::connect_lazy(&config.database).expect("lazy pool");
        let users = Arc::new(MemoryUserStore::new());
        let notifications = Arc::new(MemoryNotificationStore::new());
        let content = Arc::new(MemoryContentStore::new());
        let mailer = Arc::new(CapturingMailer::default());
        let storage = Arc::new(StorageManager::from_provider(
            Arc::new(FakeStorage),
            &config.storage.default_profile_image_url,
        ));

        let state = build_state(
            config,
            Infrastructure {
                db,
                cache: CacheManager::in_memory(),
                users: users.clone(),
                notifications: notifications.clone(),
                posts: content.clone(),
                comments: content.clone(),
                likes: content.clone(),
                tags: content.clone(),
                storage,
                mailer: mailer.clone(),
            },
        );

        Self {
            router: build_app(state.clone()),
            state,
            users,
            notifications,
            content,
            mailer,
        }
    }

    /// Insert a user (and their blog) directly into the store.
    pub async fn create_user(&self, user_id: &str, password: &str) {
        let hash = PasswordHasher::new().hash_password(password).expect("hash");
        self.users
            .register(&CreateUser {
                user_id: user_id.to_string(),
                password_hash: hash,
                email: format!("{user_id}@example.com"),
                user_name: user_id.to_string(),
                nickname: format!("{user_id}-nick"),
                phone_number: None,
                profile_image_url: DEFAULT_PROFILE.to_string(),
            })
            .await
            .expect("register user");
    }

    /// Sign in and return `(access_token, refresh_token)`.
    pub async fn sign_in(&self, user_id: &str, password: &str) -> (String, String) {
        let response = self
            .request(
                "POST",
                "/api/users/sign-in",
                Some(serde_json::json!({ "userId": user_id, "password": password })),
                Credentials::default(),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "sign-in failed: {}", response.body);
        (
            response.access_token().expect("access header"),
            response.refresh_cookie().expect("refresh cookie"),
        )
    }

    /// Send a JSON request through the router.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        credentials: Credentials<'_>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = credentials.access {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(token) = credentials.refresh {
            builder = builder.header(header::COOKIE, format!("REFRESH={token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.send(request).await
    }

    /// Send a prepared request and collect the JSON body.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.expect("oneshot");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Build a `multipart/form-data` body from `(name, filename, content_type, bytes)` parts.
pub fn multipart_body(parts: &[(&str, Option<&str>, &str, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "----blog-test-boundary".to_string();
    let mut body = Vec::new();
    for (name, file_name, content_type, data) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match file_name {
            Some(file) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (boundary, body)
}
