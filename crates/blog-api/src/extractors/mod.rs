//! Custom Axum extractors.

pub mod auth;
pub mod multipart;

pub use auth::AuthUser;
pub use multipart::MultipartForm;
