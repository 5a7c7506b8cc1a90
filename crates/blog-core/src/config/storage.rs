//! Object storage configuration for profile and post images.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage provider: `"s3"` or `"local"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// URL used when a user signs up without a profile image.
    #[serde(default = "default_profile_image")]
    pub default_profile_image_url: String,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
    /// Local disk storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            default_profile_image_url: default_profile_image(),
            s3: S3StorageConfig::default(),
            local: LocalStorageConfig::default(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO). Empty uses AWS.
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default)]
    pub region: String,
    /// S3 bucket name.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID. Empty defers to the default credential chain.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Public base URL of uploaded objects. Empty derives the virtual-host URL.
    #[serde(default)]
    pub public_base_url: String,
}

/// Local disk storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root directory for stored files.
    #[serde(default = "default_root")]
    pub root: String,
    /// Public base URL that maps onto `root`.
    #[serde(default = "default_public_base")]
    pub public_base_url: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            public_base_url: default_public_base(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_profile_image() -> String {
    "/static/default-profile.png".to_string()
}

fn default_root() -> String {
    "./data/uploads".to_string()
}

fn default_public_base() -> String {
    "/uploads".to_string()
}
