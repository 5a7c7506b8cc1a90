//! # blog-service
//!
//! Business logic service layer for the blog platform. Each service
//! orchestrates stores, repositories, cache, object storage, and the
//! authentication gate to implement one group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod account;
pub mod content;
pub mod notification;

mod validation;

pub use account::{AccountService, EmailVerificationService, LogMailSender};
pub use content::{
    CommentForm, CommentService, LikeService, PopularPostCache, PostForm, PostService,
};
pub use notification::NotificationService;
