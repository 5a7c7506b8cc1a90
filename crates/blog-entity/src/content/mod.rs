//! Posts, comments, likes, and tags.

pub mod comment;
pub mod like;
pub mod post;
pub mod tag;

pub use comment::{Comment, CreateComment};
pub use like::Liked;
pub use post::{CreatePost, Post};
pub use tag::Tag;
