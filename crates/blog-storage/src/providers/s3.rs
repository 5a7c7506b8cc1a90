//! S3-compatible object storage uploader.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, info};

use blog_core::config::storage::S3StorageConfig;
use blog_core::error::{AppError, ErrorCode};
use blog_core::result::AppResult;
use blog_core::traits::storage::{ObjectStorage, UploadFile};

use super::object_key;

/// Uploads files to an S3 bucket.
#[derive(Debug, Clone)]
pub struct S3Uploader {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Uploader {
    /// Create a new S3 uploader from configuration.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("storage.s3.bucket must be set"));
        }
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 uploader"
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if !config.region.is_empty() {
            loader = loader.region(Region::new(config.region.clone()));
        }
        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "blog-config",
            ));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if !config.endpoint.is_empty() {
            builder = builder
                .endpoint_url(config.endpoint.clone())
                .force_path_style(true);
        }

        let public_base_url = if config.public_base_url.is_empty() {
            format!(
                "https://{}.s3.{}.amazonaws.com",
                config.bucket, config.region
            )
        } else {
            config.public_base_url.trim_end_matches('/').to_string()
        };

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            public_base_url,
        })
    }
}

#[async_trait]
impl ObjectStorage for S3Uploader {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn upload(&self, file: &UploadFile, directory: &str) -> AppResult<String> {
        let key = object_key(directory, &file.file_name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .set_content_type(file.content_type.clone())
            .content_length(file.data.len() as i64)
            .body(ByteStream::from(file.data.clone()))
            .send()
            .await
            .map_err(|e| AppError::coded_with(ErrorCode::FailS3Upload, e))?;

        debug!(bucket = %self.bucket, key = %key, bytes = file.data.len(), "Uploaded object");
        Ok(format!("{}/{key}", self.public_base_url))
    }
}
