//! Database abstraction layer
//!
//! Trait seams between the core and the replica, implemented for
//! PostgreSQL in [`crate::adapters::postgresql`].

pub mod traits;

pub use traits::{ReplicationCatalog, ReportDatabase, RowCursor, TextRow};
