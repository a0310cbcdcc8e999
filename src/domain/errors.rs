//! Domain error types
//!
//! This module defines the error hierarchy for the reporting service.
//! All errors are domain-specific and don't expose third-party types.

use std::path::PathBuf;
use thiserror::Error;

/// Main reporting error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ReportingError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// CSV export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Object store upload errors
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// The replica failed its health gate; carries the health summary
    #[error("Replication unhealthy: {0}")]
    ReplicationUnhealthy(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while streaming a query result into a CSV sink
#[derive(Debug, Error)]
pub enum ExportError {
    /// The export query was empty or whitespace only
    #[error("SQL query is not provided")]
    EmptyQuery,

    /// Writing to the destination failed
    #[error("Failure to write to file: {0}")]
    Io(#[from] std::io::Error),

    /// Preparing, advancing or closing the cursor failed
    #[error("Failure during CSV creation: {0}")]
    Query(#[source] Box<ReportingError>),
}

/// Errors raised by an object store uploader
#[derive(Debug, Error)]
pub enum UploadError {
    /// Either the local file or the target name is not a CSV
    #[error("Attempting to upload file that is not a CSV file: {0}")]
    NotCsv(PathBuf),

    /// The transfer itself failed
    #[error("Transfer failed: {0}")]
    Transfer(String),

    /// The local file could not be read
    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },
}

impl ReportingError {
    /// Whether this error came out of the replication health gate
    pub fn is_replication_unhealthy(&self) -> bool {
        matches!(self, ReportingError::ReplicationUnhealthy(_))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ReportingError {
    fn from(err: std::io::Error) -> Self {
        ReportingError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ReportingError {
    fn from(err: serde_json::Error) -> Self {
        ReportingError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ReportingError {
    fn from(err: toml::de::Error) -> Self {
        ReportingError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<tokio_postgres::Error> for ReportingError {
    fn from(err: tokio_postgres::Error) -> Self {
        ReportingError::Database(err.to_string())
    }
}

impl From<ReportingError> for ExportError {
    fn from(err: ReportingError) -> Self {
        ExportError::Query(Box::new(err))
    }
}
