//! # blog-core
//!
//! Core building blocks shared by every crate of the blog platform:
//! configuration loading, the unified error type with its stable wire codes,
//! pagination math, and the provider traits (cache, object storage, mail)
//! that infrastructure crates implement.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorCode, ErrorKind};
pub use result::AppResult;
