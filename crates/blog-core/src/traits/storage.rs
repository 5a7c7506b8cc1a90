//! Object storage boundary used for profile and post images.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// A file received from a client, ready to be stored.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original file name as sent by the client.
    pub file_name: String,
    /// MIME type, if the client sent one.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Bytes,
}

impl UploadFile {
    /// Whether the upload carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Stores files and returns the public URL they are served from.
///
/// Failures surface as the `FAIL_S3_UPLOAD` error code so callers can abort
/// the surrounding write before anything is persisted.
#[async_trait]
pub trait ObjectStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Short identifier of the backend (`"s3"`, `"local"`).
    fn provider_type(&self) -> &str;

    /// Store `file` under `directory` and return its public URL.
    async fn upload(&self, file: &UploadFile, directory: &str) -> AppResult<String>;
}
