//! PostgreSQL repository implementations for every blog entity.

pub mod comment;
pub mod like;
pub mod notification;
pub mod post;
pub mod tag;
pub mod user;

pub use comment::CommentRepository;
pub use like::LikeRepository;
pub use notification::NotificationRepository;
pub use post::{PostOrder, PostRepository};
pub use tag::TagRepository;
pub use user::UserRepository;
