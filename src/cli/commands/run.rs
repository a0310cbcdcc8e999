//! Run command implementation
//!
//! Full pass: health gate, then refresh, export and upload of every report.

use super::{connect, exit_code_for};
use crate::adapters::storage::{LocalUploader, ObjectUploader, S3Uploader};
use crate::cli::exit_code;
use crate::config::ReportingConfig;
use crate::core::health::{ReplicationHealthChecker, SystemClock};
use crate::core::orchestrator::{ReportOrchestrator, ReportStatus};
use clap::Args;
use std::sync::Arc;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Continue when the only failed health check is the row count reconciliation
    #[arg(long)]
    pub ignore_row_count_mismatch: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config: &ReportingConfig) -> anyhow::Result<i32> {
        let reports = config.report_definitions();
        if reports.is_empty() {
            tracing::warn!("No reports configured");
        }

        let adapter = match connect(config).await {
            Ok(adapter) => adapter,
            Err(code) => return Ok(code),
        };

        let checker = config
            .replication
            .enabled
            .then(|| ReplicationHealthChecker::new(adapter.clone(), Arc::new(SystemClock)));

        let uploader: Arc<dyn ObjectUploader> = if config.storage.enabled {
            Arc::new(S3Uploader::from_config(&config.storage).await)
        } else {
            tracing::warn!("Object storage disabled, reports will not be uploaded");
            Arc::new(LocalUploader::new(config.storage.key_prefix.clone()))
        };

        let orchestrator = ReportOrchestrator::new(checker, adapter, uploader, &config.export)
            .with_ignore_row_count_mismatch(
                self.ignore_row_count_mismatch || config.replication.ignore_row_count_mismatch,
            );

        println!("🚀 Running {} report(s)...", reports.len());
        let summary = match orchestrator.run_all(&reports).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(error = %e, "Report run aborted");
                eprintln!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        println!();
        for outcome in &summary.outcomes {
            match &outcome.status {
                ReportStatus::Succeeded { rows, object_key } => {
                    println!("  ✅ {} - {rows} rows -> {object_key}", outcome.report_name);
                }
                other => {
                    println!(
                        "  ❌ {} - {} failed",
                        outcome.report_name,
                        other.stage()
                    );
                }
            }
        }
        println!();
        println!(
            "Done: {} succeeded, {} failed in {:.1}s",
            summary.succeeded(),
            summary.failed(),
            summary.duration.as_secs_f64()
        );

        Ok(exit_code::SUCCESS)
    }
}
