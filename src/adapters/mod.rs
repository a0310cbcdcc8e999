//! External system integrations.
//!
//! - [`database`] - trait seams for the replica
//! - [`postgresql`] - PostgreSQL implementation of those traits
//! - [`storage`] - object store uploaders (S3 and a local no-op)
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern**: the core only sees the traits in
//! [`database`] and [`storage::ObjectUploader`], so tests run against
//! in-memory fakes.
//!
//! ```rust,no_run
//! use claims_reporting::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
//! use claims_reporting::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("claims-reporting.toml")?;
//! let client = PostgreSQLClient::new(config.postgresql.clone())?;
//! client.test_connection().await?;
//! let adapter = PostgreSQLAdapter::new(client, config.replication.clone());
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod postgresql;
pub mod storage;
