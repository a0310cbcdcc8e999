//! PostgreSQL database integration
//!
//! Replica access for the health gate and the report exporter.

pub mod adapter;
pub mod client;
pub mod cursor;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
pub use cursor::PgChunkedCursor;
