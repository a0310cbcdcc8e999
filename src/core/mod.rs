//! Core business logic.
//!
//! # Modules
//!
//! - [`health`] - replication health gate
//! - [`export`] - streaming CSV export
//! - [`orchestrator`] - per-run sequencing of gate and reports
//!
//! # Run Workflow
//!
//! 1. **Health check**: reconcile yesterday's replication summary with the replica
//! 2. **Gate**: abort the run if replication is unhealthy
//! 3. **Refresh**: bring each report's data source up to date
//! 4. **Export**: stream the report query into a temporary CSV
//! 5. **Upload**: store the CSV under `reports/<file_name>`
//! 6. **Cleanup**: delete the temporary CSV
//!
//! # Example
//!
//! ```rust,no_run
//! use claims_reporting::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
//! use claims_reporting::adapters::storage::LocalUploader;
//! use claims_reporting::config::load_config;
//! use claims_reporting::core::health::{ReplicationHealthChecker, SystemClock};
//! use claims_reporting::core::orchestrator::ReportOrchestrator;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("claims-reporting.toml")?;
//! let client = PostgreSQLClient::new(config.postgresql.clone())?;
//! let adapter = Arc::new(PostgreSQLAdapter::new(client, config.replication.clone()));
//!
//! let checker = ReplicationHealthChecker::new(adapter.clone(), Arc::new(SystemClock));
//! let orchestrator = ReportOrchestrator::new(
//!     Some(checker),
//!     adapter,
//!     Arc::new(LocalUploader::new("reports")),
//!     &config.export,
//! );
//!
//! let summary = orchestrator.run_all(&config.report_definitions()).await?;
//! println!("Succeeded: {}", summary.succeeded());
//! println!("Failed: {}", summary.failed());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod health;
pub mod orchestrator;
