//! Validate config command implementation

use crate::cli::exit_code;
use crate::config::{redact_connection_string, ReportingConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// The configuration was already loaded and validated, so this only
    /// prints what will be used.
    pub async fn execute(&self, config_path: &str, config: &ReportingConfig) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Configuration validated");

        println!("✅ Configuration is valid: {config_path}");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  PostgreSQL Connection: {}",
            redact_connection_string(&config.postgresql.connection_string)
        );
        println!("  Max Connections: {}", config.postgresql.max_connections);
        println!("  SSL Mode: {}", config.postgresql.ssl_mode);

        if config.replication.enabled {
            println!(
                "  Replication: {} (publication {}, WAL source {:?})",
                config.replication.schema,
                config.replication.publication_name,
                config.replication.wal_source
            );
            if config.replication.ignore_row_count_mismatch {
                println!("  Row count mismatches: ignored");
            }
        } else {
            println!("  Replication: health check disabled");
        }

        println!(
            "  Export: chunk size {}, flush every {} rows, temp dir {}",
            config.export.data_chunk_size,
            config.export.buffer_flush_frequency,
            config.export.temp_dir().display()
        );

        if config.storage.enabled {
            println!(
                "  Storage: s3://{}/{}",
                config.storage.bucket, config.storage.key_prefix
            );
        } else {
            println!("  Storage: disabled");
        }

        println!("  Reports:");
        for report in config.report_definitions() {
            println!("    - {} -> {}", report.report_name, report.file_name);
        }
        println!();
        Ok(exit_code::SUCCESS)
    }
}
