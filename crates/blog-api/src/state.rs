//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use blog_auth::AuthenticationGate;
use blog_cache::CacheManager;
use blog_core::config::AppConfig;
use blog_database::DatabasePool;
use blog_realtime::RealtimeEngine;
use blog_service::{
    AccountService, CommentService, EmailVerificationService, LikeService, NotificationService,
    PostService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db: DatabasePool,
    /// Cache manager (Redis or in-memory)
    pub cache: CacheManager,

    // ── Auth & Realtime ──────────────────────────────────────
    /// Access/refresh token gate
    pub gate: Arc<AuthenticationGate>,
    /// Push subscriptions and notification dispatch
    pub realtime: Arc<RealtimeEngine>,

    // ── Services ─────────────────────────────────────────────
    /// Sign-up, sign-in, sign-out, withdrawal
    pub accounts: Arc<AccountService>,
    /// Email verification codes
    pub verification: Arc<EmailVerificationService>,
    /// Posts
    pub posts: Arc<PostService>,
    /// Comments
    pub comments: Arc<CommentService>,
    /// Likes
    pub likes: Arc<LikeService>,
    /// Notifications
    pub notifications: Arc<NotificationService>,
}
