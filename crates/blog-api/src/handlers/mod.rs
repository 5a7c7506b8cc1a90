//! HTTP request handlers, grouped by resource.

pub mod comment;
pub mod health;
pub mod like;
pub mod notification;
pub mod post;
pub mod user;
