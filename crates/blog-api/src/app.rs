//! Application builder: wires stores, services, and the realtime engine into
//! an [`AppState`], and the router plus middleware into an Axum app.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tracing::{info, warn};

use blog_auth::{AuthenticationGate, CacheSessionStore, PasswordHasher, TokenCodec};
use blog_cache::CacheManager;
use blog_core::config::AppConfig;
use blog_core::error::AppError;
use blog_core::traits::MailSender;
use blog_database::repositories::{
    CommentRepository, LikeRepository, NotificationRepository, PostRepository, TagRepository,
    UserRepository,
};
use blog_database::{
    CommentStore, DatabasePool, LikeStore, NotificationStore, PostStore, TagStore, UserStore,
};
use blog_realtime::RealtimeEngine;
use blog_service::{
    AccountService, CommentService, EmailVerificationService, LikeService, LogMailSender,
    NotificationService, PopularPostCache, PostService,
};
use blog_storage::StorageManager;

use crate::router::build_router;
use crate::state::AppState;

/// Infrastructure handed to [`build_state`].
///
/// Every store is a trait object so the PostgreSQL repositories can be
/// swapped for in-memory stores.
#[derive(Debug, Clone)]
pub struct Infrastructure {
    /// PostgreSQL pool.
    pub db: DatabasePool,
    /// Cache for sessions, verification codes, and popular posts.
    pub cache: CacheManager,
    /// User store.
    pub users: Arc<dyn UserStore>,
    /// Notification store.
    pub notifications: Arc<dyn NotificationStore>,
    /// Post store.
    pub posts: Arc<dyn PostStore>,
    /// Comment store.
    pub comments: Arc<dyn CommentStore>,
    /// Like store.
    pub likes: Arc<dyn LikeStore>,
    /// Tag store.
    pub tags: Arc<dyn TagStore>,
    /// Image storage.
    pub storage: Arc<StorageManager>,
    /// Outbound mail.
    pub mailer: Arc<dyn MailSender>,
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Wire every service over the given infrastructure.
///
/// Must be called inside a Tokio runtime: the notification dispatcher spawns
/// its workers here.
pub fn build_state(config: AppConfig, infra: Infrastructure) -> AppState {
    // ── Auth ─────────────────────────────────────────────────────
    let codec = Arc::new(TokenCodec::new(&config.auth));
    let sessions = Arc::new(CacheSessionStore::new(infra.cache.clone()));
    let gate = Arc::new(AuthenticationGate::new(
        &config.auth,
        codec,
        sessions,
        Arc::clone(&infra.users),
    ));
    let hasher = Arc::new(PasswordHasher::new());

    // ── Realtime ─────────────────────────────────────────────────
    let realtime = Arc::new(RealtimeEngine::new(
        &config.realtime,
        Arc::clone(&infra.notifications),
    ));

    // ── Services ─────────────────────────────────────────────────
    let verification = Arc::new(EmailVerificationService::new(
        Arc::clone(&infra.users),
        infra.cache.clone(),
        Arc::clone(&infra.mailer),
        config.mail.clone(),
    ));
    let accounts = Arc::new(AccountService::new(
        Arc::clone(&infra.users),
        Arc::clone(&gate),
        hasher,
        Arc::clone(&infra.storage),
        Arc::clone(&verification),
    ));
    let popular = PopularPostCache::new(
        infra.cache.clone(),
        config.post.popular_like_threshold,
        Duration::from_secs(config.post.popular_cache_ttl_seconds),
    );
    let posts = Arc::new(PostService::new(
        infra.posts,
        Arc::clone(&infra.comments),
        infra.tags,
        Arc::clone(&infra.users),
        Arc::clone(&infra.storage),
        popular,
    ));
    let comments = Arc::new(CommentService::new(
        infra.comments,
        Arc::clone(&posts),
        Arc::clone(&realtime.dispatcher),
    ));
    let likes = Arc::new(LikeService::new(infra.likes, Arc::clone(&posts)));
    let notifications = Arc::new(NotificationService::new(
        infra.notifications,
        Arc::clone(&realtime.registry),
    ));

    AppState {
        config: Arc::new(config),
        db: infra.db,
        cache: infra.cache,
        gate,
        realtime,
        accounts,
        verification,
        posts,
        comments,
        likes,
        notifications,
    }
}

/// Runs the blog server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db: DatabasePool) -> Result<(), AppError> {
    info!("Starting blog server...");

    // ── Step 1: Initialize cache ─────────────────────────────────
    info!(provider = %config.cache.provider, "Initializing cache...");
    let cache = CacheManager::new(&config.cache).await?;

    // ── Step 2: Initialize storage ───────────────────────────────
    info!(provider = %config.storage.provider, "Initializing storage...");
    let storage = Arc::new(StorageManager::new(&config.storage).await?);

    // ── Step 3: Initialize stores ────────────────────────────────
    let pool = db.pool().clone();
    let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(pool.clone()));
    let notifications: Arc<dyn NotificationStore> =
        Arc::new(NotificationRepository::new(pool.clone()));
    let posts: Arc<dyn PostStore> = Arc::new(PostRepository::new(pool.clone()));
    let comments: Arc<dyn CommentStore> = Arc::new(CommentRepository::new(pool.clone()));
    let likes: Arc<dyn LikeStore> = Arc::new(LikeRepository::new(pool.clone()));
    let tags: Arc<dyn TagStore> = Arc::new(TagRepository::new(pool));
    let mailer: Arc<dyn MailSender> = Arc::new(LogMailSender::new(config.mail.sender.clone()));

    // ── Step 4: Wire services and realtime engine ────────────────
    let state = build_state(
        config.clone(),
        Infrastructure {
            db: db.clone(),
            cache,
            users,
            notifications,
            posts,
            comments,
            likes,
            tags,
            storage,
            mailer,
        },
    );
    let realtime = Arc::clone(&state.realtime);

    // ── Step 5: Build and start HTTP server ──────────────────────
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(addr = %addr, "Blog server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 6: Drain ────────────────────────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    match tokio::time::timeout(grace, realtime.shutdown()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Realtime shutdown failed"),
        Err(_) => warn!(grace_seconds = grace.as_secs(), "Realtime shutdown timed out"),
    }
    db.close().await;

    info!("Blog server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, starting graceful shutdown...");
}
