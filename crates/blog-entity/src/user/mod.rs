//! User and blog ownership entities.

pub mod blog;
pub mod model;
pub mod role;

pub use blog::Blog;
pub use model::{BlogUser, CreateUser};
pub use role::UserRole;
