//! Storage manager: builds the configured uploader and fronts it.

use std::sync::Arc;

use tracing::info;

use blog_core::config::storage::StorageConfig;
use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_core::traits::storage::{ObjectStorage, UploadFile};

/// Directory for profile images.
pub const PROFILE_DIRECTORY: &str = "profile-image";
/// Directory for post images.
pub const POST_DIRECTORY: &str = "post-image";

/// Holds the active uploader and the default profile image URL.
#[derive(Debug, Clone)]
pub struct StorageManager {
    inner: Arc<dyn ObjectStorage>,
    default_profile_image_url: String,
}

impl StorageManager {
    /// Build the uploader selected by `config.provider`.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let inner: Arc<dyn ObjectStorage> = match config.provider.as_str() {
            #[cfg(feature = "s3")]
            "s3" => Arc::new(crate::providers::s3::S3Uploader::new(&config.s3).await?),
            #[cfg(feature = "local")]
            "local" => Arc::new(crate::providers::local::LocalUploader::new(&config.local).await?),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage provider: '{other}'. Supported: s3, local"
                )));
            }
        };
        info!(provider = inner.provider_type(), "Object storage ready");

        Ok(Self {
            inner,
            default_profile_image_url: config.default_profile_image_url.clone(),
        })
    }

    /// Wrap an existing uploader (for testing).
    pub fn from_provider(provider: Arc<dyn ObjectStorage>, default_profile_image_url: &str) -> Self {
        Self {
            inner: provider,
            default_profile_image_url: default_profile_image_url.to_string(),
        }
    }

    /// URL used when a user signs up without an image.
    pub fn default_profile_image_url(&self) -> &str {
        &self.default_profile_image_url
    }

    /// Upload one file.
    pub async fn upload(&self, file: &UploadFile, directory: &str) -> AppResult<String> {
        self.inner.upload(file, directory).await
    }

    /// Upload files in order, skipping empty parts. Stops at the first failure.
    pub async fn upload_all(&self, files: &[UploadFile], directory: &str) -> AppResult<Vec<String>> {
        let mut urls = Vec::with_capacity(files.len());
        for file in files.iter().filter(|f| !f.is_empty()) {
            urls.push(self.inner.upload(file, directory).await?);
        }
        Ok(urls)
    }
}
