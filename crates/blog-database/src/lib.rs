//! # blog-database
//!
//! PostgreSQL connection management, the store traits every service depends
//! on, concrete sqlx repositories for every blog entity, and in-memory stores
//! for tests and local runs.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{CommentStore, LikeStore, NotificationStore, PostStore, TagStore, UserStore};
