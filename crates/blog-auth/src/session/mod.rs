//! Refresh-token sessions: one active refresh token per user.

pub mod store;

pub use store::{CacheSessionStore, SessionStore};
