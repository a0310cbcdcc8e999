//! Report orchestrator - main driver for one reporting run
//!
//! A run moves through `START -> HEALTH_CHECK -> (ABORTED | RUNNING) -> DONE`.
//! The health gate runs first; an unacceptable verdict aborts the run before
//! any report is touched. Each report then goes through refresh, export and
//! upload on its own, and a failure in one never stops the next.

use super::summary::{ReportOutcome, ReportStatus, RunSummary};
use crate::adapters::database::ReportDatabase;
use crate::adapters::storage::ObjectUploader;
use crate::config::ExportConfig;
use crate::core::export::StreamingCsvExporter;
use crate::core::health::{ReplicationHealthChecker, ReplicationHealthReport};
use crate::domain::{ReportDefinition, ReportingError, Result};
use crate::{log_report_complete, log_report_failure, log_report_start};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Runs the health gate and every configured report
pub struct ReportOrchestrator {
    health_checker: Option<ReplicationHealthChecker>,
    ignore_row_count_mismatch: bool,
    database: Arc<dyn ReportDatabase>,
    exporter: StreamingCsvExporter,
    uploader: Arc<dyn ObjectUploader>,
    temp_dir: PathBuf,
}

impl ReportOrchestrator {
    /// Create a new orchestrator
    ///
    /// Passing `None` for `health_checker` skips the gate.
    pub fn new(
        health_checker: Option<ReplicationHealthChecker>,
        database: Arc<dyn ReportDatabase>,
        uploader: Arc<dyn ObjectUploader>,
        export: &ExportConfig,
    ) -> Self {
        let exporter = StreamingCsvExporter::new(
            database.clone(),
            export.data_chunk_size,
            export.buffer_flush_frequency,
        );
        Self {
            health_checker,
            ignore_row_count_mismatch: false,
            database,
            exporter,
            uploader,
            temp_dir: export.temp_dir(),
        }
    }

    /// Proceed when the only failed check is the count reconciliation
    pub fn with_ignore_row_count_mismatch(mut self, ignore: bool) -> Self {
        self.ignore_row_count_mismatch = ignore;
        self
    }

    /// Runs every report in order
    ///
    /// # Errors
    ///
    /// - [`ReportingError::ReplicationUnhealthy`] carrying the health summary
    ///   when the gate rejects the replica
    /// - a database error if the health check itself cannot run
    ///
    /// Per-report failures are recorded in the returned [`RunSummary`].
    pub async fn run_all(&self, reports: &[ReportDefinition]) -> Result<RunSummary> {
        let started = Instant::now();
        tracing::info!(reports = reports.len(), "Starting report run");

        let health = self.check_gate().await?;
        let mut summary = RunSummary::new(health);

        for report in reports {
            summary.add_outcome(self.run_report(report).await);
        }

        let summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    async fn check_gate(&self) -> Result<Option<ReplicationHealthReport>> {
        let Some(checker) = &self.health_checker else {
            tracing::warn!("Replication health check disabled, exporting without verification");
            return Ok(None);
        };

        let report = checker.check_health().await?;
        if !report.is_acceptable(self.ignore_row_count_mismatch) {
            tracing::error!("Replication is unhealthy, aborting run");
            return Err(ReportingError::ReplicationUnhealthy(report.summary()));
        }
        if !report.healthy {
            tracing::warn!(
                mismatched_tables = report.failed_checks.len(),
                "Row count mismatch ignored by configuration, continuing"
            );
        }
        Ok(Some(report))
    }

    async fn run_report(&self, report: &ReportDefinition) -> ReportOutcome {
        let started = Instant::now();
        log_report_start!(report.report_name, report.file_name);

        if let Err(e) = self.database.refresh(&report.refresh_command).await {
            log_report_failure!(report.report_name, "refresh", e);
            return ReportOutcome::new(
                report,
                ReportStatus::RefreshFailed {
                    error: e.to_string(),
                },
                started.elapsed(),
            );
        }
        tracing::debug!(report = %report.report_name, source = %report.data_source_name, "Data source refreshed");

        let artifact = self.artifact_path(&report.file_name);
        let status = self.export_and_upload(report, &artifact).await;
        remove_artifact(&artifact).await;

        let duration = started.elapsed();
        match &status {
            ReportStatus::Succeeded { rows, .. } => {
                log_report_complete!(report.report_name, *rows, duration);
            }
            ReportStatus::ExportFailed { error } | ReportStatus::UploadFailed { error, .. } => {
                log_report_failure!(report.report_name, status.stage(), error);
            }
            ReportStatus::RefreshFailed { .. } => {}
        }
        ReportOutcome::new(report, status, duration)
    }

    async fn export_and_upload(&self, report: &ReportDefinition, artifact: &Path) -> ReportStatus {
        let rows = match self
            .exporter
            .export_to_file(&report.export_query, artifact)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                return ReportStatus::ExportFailed {
                    error: e.to_string(),
                }
            }
        };

        match self.uploader.upload(artifact, &report.file_name).await {
            Ok(object_key) => ReportStatus::Succeeded { rows, object_key },
            Err(e) => ReportStatus::UploadFailed {
                rows,
                error: e.to_string(),
            },
        }
    }

    fn artifact_path(&self, file_name: &str) -> PathBuf {
        self.temp_dir.join(format!("{}_{}", Uuid::new_v4(), file_name))
    }
}

async fn remove_artifact(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed temporary artifact"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove temporary artifact"
        ),
    }
}
