//! Domain models and types for the reporting service.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Report definitions** ([`ReportDefinition`])
//! - **Replication bookkeeping** ([`ReplicationSummary`], [`WalLsn`])
//! - **Error types** ([`ReportingError`], [`ExportError`], [`UploadError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ReportingError>`]:
//!
//! ```rust
//! use claims_reporting::domain::{ReportingError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = claims_reporting::config::load_config("claims-reporting.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod replication;
pub mod report;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ExportError, ReportingError, UploadError};
pub use replication::{ReplicationSummary, WalLsn};
pub use report::ReportDefinition;
pub use result::Result;
