//! Run orchestration
//!
//! - [`ReportOrchestrator`] sequences the health gate and the reports
//! - [`RunSummary`] records what happened to each report

pub mod runner;
pub mod summary;

pub use runner::ReportOrchestrator;
pub use summary::{ReportOutcome, ReportStatus, RunSummary};
