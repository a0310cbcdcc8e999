//! Object store integration
//!
//! Generated reports are handed to an [`ObjectUploader`]. Two
//! implementations exist: [`S3Uploader`] and the no-op [`LocalUploader`]
//! used when `storage.enabled = false`.

pub mod local;
pub mod s3;

pub use local::LocalUploader;
pub use s3::S3Uploader;

use crate::domain::UploadError;
use async_trait::async_trait;
use std::path::Path;

/// Destination for generated report files
#[async_trait]
pub trait ObjectUploader: Send + Sync {
    /// Uploads `local_file` under `<prefix>/<file_name>` and returns the object key
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::NotCsv`] if either the local path or the file
    /// name does not end in `.csv`, and a transfer error if the store rejects
    /// the object.
    async fn upload(&self, local_file: &Path, file_name: &str) -> Result<String, UploadError>;
}

/// Rejects anything that is not a `.csv` on both ends
pub fn ensure_csv(local_file: &Path, file_name: &str) -> Result<(), UploadError> {
    let local_is_csv = local_file
        .to_str()
        .map(|p| p.ends_with(".csv"))
        .unwrap_or(false);
    if !local_is_csv || !file_name.ends_with(".csv") {
        return Err(UploadError::NotCsv(local_file.to_path_buf()));
    }
    Ok(())
}

/// Builds `<prefix>/<file_name>`, tolerating stray slashes on the prefix
pub fn object_key(prefix: &str, file_name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        file_name.to_string()
    } else {
        format!("{prefix}/{file_name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use test_case::test_case;

    #[test_case("/tmp/abc_report.csv", "report.csv", true ; "both csv")]
    #[test_case("/tmp/abc_report.txt", "report.csv", false ; "local not csv")]
    #[test_case("/tmp/abc_report.csv", "report.xlsx", false ; "name not csv")]
    #[test_case("/tmp/abc_report", "report", false ; "neither")]
    fn test_ensure_csv(local: &str, name: &str, accepted: bool) {
        assert_eq!(ensure_csv(&PathBuf::from(local), name).is_ok(), accepted);
    }

    #[test_case("reports", "report_000.csv", "reports/report_000.csv" ; "plain")]
    #[test_case("/reports/", "report_000.csv", "reports/report_000.csv" ; "slashes trimmed")]
    #[test_case("claims/reports", "r.csv", "claims/reports/r.csv" ; "nested")]
    fn test_object_key(prefix: &str, name: &str, expected: &str) {
        assert_eq!(object_key(prefix, name), expected);
    }
}
