//! Local filesystem uploader.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use blog_core::config::storage::LocalStorageConfig;
use blog_core::error::{AppError, ErrorCode};
use blog_core::result::AppResult;
use blog_core::traits::storage::{ObjectStorage, UploadFile};

use super::object_key;

/// Stores uploads below a root directory on local disk.
#[derive(Debug, Clone)]
pub struct LocalUploader {
    /// Root directory for all stored files.
    root: PathBuf,
    /// Public URL prefix mapped onto `root`.
    public_base_url: String,
}

impl LocalUploader {
    /// Create a new local uploader, creating the root directory if needed.
    pub async fn new(config: &LocalStorageConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.root);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::coded_with(ErrorCode::FailS3Upload, format!("{}: {e}", root.display()))
        })?;
        Ok(Self {
            root,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ObjectStorage for LocalUploader {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn upload(&self, file: &UploadFile, directory: &str) -> AppResult<String> {
        let key = object_key(directory, &file.file_name);
        let full_path = self.root.join(&key);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::coded_with(ErrorCode::FailS3Upload, e))?;
        }
        fs::write(&full_path, &file.data)
            .await
            .map_err(|e| AppError::coded_with(ErrorCode::FailS3Upload, e))?;

        debug!(key = %key, bytes = file.data.len(), "Stored upload on disk");
        Ok(format!("{}/{key}", self.public_base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn sample() -> UploadFile {
        UploadFile {
            file_name: "avatar.png".into(),
            content_type: Some("image/png".into()),
            data: Bytes::from_static(b"png-bytes"),
        }
    }

    #[tokio::test]
    async fn test_upload_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let uploader = LocalUploader::new(&LocalStorageConfig {
            root: dir.path().to_string_lossy().into_owned(),
            public_base_url: "/uploads/".into(),
        })
        .await
        .unwrap();

        let url = uploader.upload(&sample(), "profile").await.unwrap();
        assert!(url.starts_with("/uploads/profile/"));
        assert!(url.ends_with("_avatar.png"));

        let relative = url.trim_start_matches("/uploads/");
        let stored = std::fs::read(dir.path().join(relative)).unwrap();
        assert_eq!(stored, b"png-bytes");
    }

    #[tokio::test]
    async fn test_unwritable_root_fails_with_upload_code() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let err = LocalUploader::new(&LocalStorageConfig {
            root: blocker.join("nested").to_string_lossy().into_owned(),
            public_base_url: "/uploads".into(),
        })
        .await
        .unwrap_err();
        assert!(err.is(ErrorCode::FailS3Upload));
    }
}
