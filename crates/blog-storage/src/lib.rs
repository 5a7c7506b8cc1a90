//! # blog-storage
//!
//! Object storage for profile and post images. Two uploaders implement
//! [`blog_core::traits::storage::ObjectStorage`]:
//!
//! - **s3**: S3-compatible bucket via `aws-sdk-s3`
//! - **local**: files on local disk, served under a public base URL
//!
//! [`StorageManager`] selects one from configuration.

pub mod manager;
pub mod providers;

pub use manager::StorageManager;
