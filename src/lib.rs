// Claims Reporting - replication health gate and CSV report export
// Copyright (c) 2025 Claims Reporting Contributors
// Licensed under the MIT License

//! # Claims Reporting
//!
//! Batch job that verifies a logically replicated PostgreSQL database is
//! caught up with its source, then exports a set of reporting views to CSV
//! and uploads them to S3.
//!
//! ## Overview
//!
//! One run:
//! - **Verifies** replication against yesterday's replication summary
//! - **Refreshes** each report's data source
//! - **Streams** each report query into a CSV file through a server-side cursor
//! - **Uploads** the file to the object store and deletes the local copy
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Health gate, CSV export and run orchestration
//! - [`adapters`] - PostgreSQL and object store integrations
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use claims_reporting::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
//! use claims_reporting::adapters::storage::S3Uploader;
//! use claims_reporting::config::load_config;
//! use claims_reporting::core::health::{ReplicationHealthChecker, SystemClock};
//! use claims_reporting::core::orchestrator::ReportOrchestrator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("claims-reporting.toml")?;
//!
//!     let client = PostgreSQLClient::new(config.postgresql.clone())?;
//!     let adapter = Arc::new(PostgreSQLAdapter::new(client, config.replication.clone()));
//!     let uploader = Arc::new(S3Uploader::from_config(&config.storage).await);
//!
//!     let checker = ReplicationHealthChecker::new(adapter.clone(), Arc::new(SystemClock));
//!     let orchestrator = ReportOrchestrator::new(Some(checker), adapter, uploader, &config.export);
//!
//!     let summary = orchestrator.run_all(&config.report_definitions()).await?;
//!     println!("{} of {} reports uploaded", summary.succeeded(), summary.outcomes.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Replication Health
//!
//! The gate fails when a published table has no summary row, when a summary
//! records a WAL position ahead of the replica, or when live counts differ
//! from the summary. Count mismatches alone can be tolerated with
//! `replication.ignore_row_count_mismatch`.
//!
//! ```rust,no_run
//! use claims_reporting::core::health::{ReplicationHealthChecker, SystemClock};
//! # use claims_reporting::adapters::database::ReplicationCatalog;
//! # use std::sync::Arc;
//!
//! # async fn example(catalog: Arc<dyn ReplicationCatalog>) -> claims_reporting::domain::Result<()> {
//! let checker = ReplicationHealthChecker::new(catalog, Arc::new(SystemClock));
//! let report = checker.check_health().await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::ReportingError`]:
//!
//! ```rust,no_run
//! use claims_reporting::domain::ReportingError;
//!
//! fn example() -> Result<(), ReportingError> {
//!     let config = claims_reporting::config::load_config("claims-reporting.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
