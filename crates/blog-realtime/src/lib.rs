//! # blog-realtime
//!
//! Server-push notification delivery for the blog platform. Provides:
//!
//! - Structured stream ids (`{userId}_{seq}`) with a per-user monotonic sequence
//! - A per-process [`SubscriptionRegistry`] of open push connections
//! - A bounded per-user replay cache for reconnecting clients
//! - A [`NotificationDispatcher`] worker pool that keeps fan-out off the
//!   request path
//!
//! The registry is injected behind a trait so a shared pub/sub backend can
//! replace the in-process one without touching callers.

pub mod connection;
pub mod event;
pub mod notification;
pub mod replay;
pub mod server;
pub mod stream_id;
pub mod subscription;

pub use connection::registry::{LocalSubscriptionRegistry, SubscriptionRegistry};
pub use event::{EVENT_NAME, NotificationView, PushEvent};
pub use notification::dispatcher::{NotificationDispatcher, SubmitOutcome};
pub use server::RealtimeEngine;
pub use stream_id::StreamId;
pub use subscription::Subscription;
