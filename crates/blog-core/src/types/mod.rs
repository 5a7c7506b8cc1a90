//! Shared value types.

pub mod pagination;

pub use pagination::{PageResult, Pagination, SearchParams};
