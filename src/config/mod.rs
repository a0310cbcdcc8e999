//! Configuration management for the reporting service.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `REPORTING_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use claims_reporting::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("claims-reporting.toml")?;
//!
//! println!("Bucket: {}", config.storage.bucket);
//! for report in config.report_definitions() {
//!     println!("{} -> {}", report.report_name, report.file_name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`PostgreSQLConfig`] - replica connection pool
//! - [`ReplicationConfig`] - health gate
//! - [`ExportConfig`] - chunk size, flush frequency, temp directory
//! - [`StorageConfig`] - S3 bucket and endpoint
//! - [`LoggingConfig`] - local log files
//! - [`ReportConfig`] - one `[[reports]]` entry
//!
//! # Example Configuration
//!
//! ```toml
//! [postgresql]
//! connection_string = "${REPORTING_DATABASE_URL}"
//!
//! [replication]
//! schema = "claims"
//! wal_source = "subscription"
//!
//! [storage]
//! bucket = "claims-reports"
//! region = "ca-central-1"
//!
//! [[reports]]
//! report_name = "REPORT000"
//! data_source_name = "claims.mvw_report_000"
//! file_name = "report_000.csv"
//!
//! [[reports]]
//! report_name = "REPORT013"
//! data_source_name = "claims.report_013"
//! refresh_command = "SELECT claims.refresh_report013()"
//! file_name = "report_013.csv"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, ExportConfig, LoggingConfig, PostgreSQLConfig, ReplicationConfig,
    ReportConfig, ReportingConfig, StorageConfig, WalSource,
};
pub use secret::{redact_connection_string, secret_string, SecretString, SecretValue};
