//! S3 uploader
//!
//! Credentials come from the AWS default provider chain (environment,
//! profile, instance role). `endpoint_url` switches to path-style
//! addressing for S3-compatible stores.

use super::{ensure_csv, object_key, ObjectUploader};
use crate::config::StorageConfig;
use crate::domain::UploadError;
use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use std::path::Path;
use std::time::{Duration, Instant};

const CSV_CONTENT_TYPE: &str = "text/csv";

/// Uploads report files to one bucket
pub struct S3Uploader {
    client: S3Client,
    bucket: String,
    key_prefix: String,
}

impl S3Uploader {
    /// Builds the S3 client from configuration
    pub async fn from_config(config: &StorageConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(timeout)
                .connect_timeout(timeout)
                .build(),
        );
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(
            S3Client::from_conf(builder.build()),
            config.bucket.clone(),
            config.key_prefix.clone(),
        )
    }

    pub fn new(client: S3Client, bucket: impl Into<String>, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            key_prefix: key_prefix.into(),
        }
    }
}

#[async_trait]
impl ObjectUploader for S3Uploader {
    async fn upload(&self, local_file: &Path, file_name: &str) -> Result<String, UploadError> {
        ensure_csv(local_file, file_name)?;
        let key = object_key(&self.key_prefix, file_name);

        let body = ByteStream::from_path(local_file)
            .await
            .map_err(|e| UploadError::Io {
                path: local_file.to_path_buf(),
                message: e.to_string(),
            })?;

        let started = Instant::now();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(CSV_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                UploadError::Transfer(format!(
                    "s3://{}/{}: {}",
                    self.bucket,
                    key,
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            duration_ms = started.elapsed().as_millis() as u64,
            "Uploaded report"
        );
        Ok(key)
    }
}
