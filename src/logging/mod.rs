//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - console output filtered by level
//! - optional JSON log files with rotation
//!
//! # Example
//!
//! ```no_run
//! use claims_reporting::logging::init_logging;
//! use claims_reporting::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of one report
///
/// # Example
///
/// ```no_run
/// use claims_reporting::log_report_start;
///
/// log_report_start!("REPORT012", "report_012.csv");
/// ```
#[macro_export]
macro_rules! log_report_start {
    ($report_name:expr, $file_name:expr) => {
        tracing::info!(
            report = %$report_name,
            file_name = %$file_name,
            "Starting report"
        );
    };
}

/// Log the successful completion of one report
///
/// # Example
///
/// ```no_run
/// use claims_reporting::log_report_complete;
/// use std::time::Duration;
///
/// log_report_complete!("REPORT012", 42_u64, Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_report_complete {
    ($report_name:expr, $rows:expr, $duration:expr) => {
        tracing::info!(
            report = %$report_name,
            rows = $rows,
            duration_ms = $duration.as_millis() as u64,
            "Report completed"
        );
    };
}

/// Log a per-report failure with the stage it failed in
///
/// # Example
///
/// ```no_run
/// use claims_reporting::log_report_failure;
///
/// log_report_failure!("REPORT012", "refresh", "relation does not exist");
/// ```
#[macro_export]
macro_rules! log_report_failure {
    ($report_name:expr, $stage:expr, $error:expr) => {
        tracing::error!(
            report = %$report_name,
            stage = $stage,
            error = %$error,
            "Report failed"
        );
    };
}

/// Log export progress after a fetched chunk
#[macro_export]
macro_rules! log_chunk_progress {
    ($chunk:expr, $rows_so_far:expr) => {
        tracing::debug!(
            chunk = $chunk,
            rows_so_far = $rows_so_far,
            "Fetched chunk"
        );
    };
}
