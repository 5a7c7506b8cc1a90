//! Route definitions for the blog HTTP API.
//!
//! All routes are organized by resource and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// The SSE subscription is mounted outside the request timeout; everything
/// else is bounded by `server.request_timeout_seconds`.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_mb * 1024 * 1024;
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds.max(1));

    let bounded = Router::new()
        .merge(user_routes())
        .merge(post_routes())
        .merge(comment_routes())
        .merge(like_routes())
        .merge(notification_routes())
        .merge(health_routes())
        .layer(TimeoutLayer::new(timeout));

    let streaming = Router::new().route(
        "/notifications/subscribe",
        get(handlers::notification::subscribe),
    );

    let cors = build_cors_layer(&state.config.server.cors, &state.config.auth);

    Router::new()
        .nest("/api", bounded.merge(streaming))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::authentication_gate,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Sign-up, verification, sign-in/out, withdrawal, profile
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(handlers::user::sign_up))
        .route(
            "/users/send-verification-code",
            post(handlers::user::send_verification_code),
        )
        .route(
            "/users/send-verification-code/check",
            post(handlers::user::check_verification_code),
        )
        .route("/users/sign-in", post(handlers::user::sign_in))
        .route("/users/sign-out", post(handlers::user::sign_out))
        .route("/users/withdraw", delete(handlers::user::withdraw))
        .route("/users/me", get(handlers::user::me))
}

/// Post CRUD and listings
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/post/register", post(handlers::post::register))
        .route("/post/update/{post_id}", patch(handlers::post::update))
        .route("/post/list", get(handlers::post::list))
        .route("/post/popular", get(handlers::post::popular))
        .route("/post/tag/{tag_name}", get(handlers::post::by_tag))
        .route(
            "/post/{post_id}",
            get(handlers::post::get).delete(handlers::post::delete),
        )
}

/// Comments on posts
fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/comments/{blog_id}/{post_id}",
            post(handlers::comment::register),
        )
        .route(
            "/comments/{comment_id}",
            patch(handlers::comment::update).delete(handlers::comment::delete),
        )
}

/// Likes
fn like_routes() -> Router<AppState> {
    Router::new()
        .route("/liked/add-like", post(handlers::like::add))
        .route("/liked/delete-like", delete(handlers::like::remove))
}

/// Stored notifications (the SSE stream is mounted separately)
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list))
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/{id}/read",
            patch(handlers::notification::mark_read),
        )
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
