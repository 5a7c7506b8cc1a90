//! Notification entities.

pub mod model;

pub use model::{NewNotification, Notification, NotificationType};
