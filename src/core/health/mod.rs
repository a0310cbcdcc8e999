//! Replication health gate
//!
//! - [`ReplicationHealthChecker`] runs the checks
//! - [`ReplicationHealthReport`] carries the verdict
//! - [`Clock`] fixes what "yesterday" means

pub mod checker;
pub mod clock;
pub mod report;

pub use checker::ReplicationHealthChecker;
pub use clock::{Clock, FixedClock, SystemClock};
pub use report::ReplicationHealthReport;
