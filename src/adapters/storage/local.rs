//! Uploader used when object storage is disabled

use super::{ensure_csv, object_key, ObjectUploader};
use crate::domain::UploadError;
use async_trait::async_trait;
use std::path::Path;

/// Accepts CSV uploads and discards them
///
/// Keeps the same validation as [`super::S3Uploader`] so a run against a
/// local setup fails the same way a real one would.
#[derive(Debug, Clone)]
pub struct LocalUploader {
    key_prefix: String,
}

impl LocalUploader {
    pub fn new(key_prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
        }
    }
}

#[async_trait]
impl ObjectUploader for LocalUploader {
    async fn upload(&self, local_file: &Path, file_name: &str) -> Result<String, UploadError> {
        ensure_csv(local_file, file_name)?;
        let key = object_key(&self.key_prefix, file_name);
        tracing::info!(
            file = %local_file.display(),
            key = %key,
            "Object storage disabled, skipping upload"
        );
        Ok(key)
    }
}
