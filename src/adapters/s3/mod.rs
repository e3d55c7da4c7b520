//! S3 secondary copy

use crate::adapters::store::ObjectStorage;
use crate::domain::{KioskError, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;

/// Object storage backed by Amazon S3
pub struct S3ObjectStorage {
    client: Client,
}

impl S3ObjectStorage {
    /// Build a client from the default AWS credential chain
    ///
    /// `region` overrides the region from the environment/profile.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_sdk_s3::config::Region::new(region));
        }
        let shared = loader.load().await;
        Self {
            client: Client::new(&shared),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        content_type: &str,
    ) -> Result<()> {
        let body = ByteStream::from_path(local_path).await.map_err(|e| {
            KioskError::ObjectStorage(format!("Failed to read {}: {e}", local_path.display()))
        })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                KioskError::ObjectStorage(format!(
                    "Failed to upload s3://{bucket}/{key}: {}",
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;

        tracing::debug!(category = "secondary_storage", bucket = %bucket, key = %key, "Copied to S3");
        Ok(())
    }
}
