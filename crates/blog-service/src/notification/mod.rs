//! Notification reads, read-state transitions, and push subscriptions.

pub mod service;

pub use service::NotificationService;
