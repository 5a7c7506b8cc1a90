//! Posts, comments, likes, tags, and the popular post cache.

pub mod comment;
pub mod like;
pub mod popular;
pub mod post;
pub mod view;

#[cfg(test)]
mod fixture;

pub use comment::{CommentForm, CommentService};
pub use like::LikeService;
pub use popular::PopularPostCache;
pub use post::{PostForm, PostService};
pub use view::{CommentView, PostSummary, PostView};
