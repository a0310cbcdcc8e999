//! Check-replication command implementation

use super::{connect, exit_code_for};
use crate::cli::exit_code;
use crate::config::ReportingConfig;
use crate::core::health::{ReplicationHealthChecker, SystemClock};
use clap::Args;
use std::sync::Arc;

/// Arguments for the check-replication command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    /// Execute the check-replication command
    ///
    /// Exits 0 when healthy and 3 otherwise.
    pub async fn execute(&self, config: &ReportingConfig) -> anyhow::Result<i32> {
        let adapter = match connect(config).await {
            Ok(adapter) => adapter,
            Err(code) => return Ok(code),
        };

        let checker = ReplicationHealthChecker::new(adapter, Arc::new(SystemClock));
        let report = match checker.check_health().await {
            Ok(report) => report,
            Err(e) => {
                eprintln!("❌ Health check failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", report.summary());
        }

        Ok(if report.healthy {
            exit_code::SUCCESS
        } else {
            exit_code::ABORTED
        })
    }
}
