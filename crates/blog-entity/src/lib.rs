//! # blog-entity
//!
//! Domain entity models for the blog platform. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.

pub mod content;
pub mod notification;
pub mod user;
