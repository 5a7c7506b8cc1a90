//! # blog-api
//!
//! HTTP API layer for the blog platform built on Axum.
//!
//! Provides the REST endpoints, the SSE notification stream, middleware
//! (authentication gate, request logging, CORS), extractors, DTOs, and error
//! mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{Infrastructure, build_app, build_state, run_server};
pub use state::AppState;
