// Claims Reporting - replication health gate and CSV report export
// Copyright (c) 2025 Claims Reporting Contributors
// Licensed under the MIT License

use claims_reporting::cli::commands::run::RunArgs;
use claims_reporting::cli::{exit_code, Cli, Commands};
use claims_reporting::config::{load_config, LoggingConfig, ReportingConfig};
use claims_reporting::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let loaded = load_config(&cli.config);

    // Console-only logging when the configuration cannot be used
    let (logging_config, config_level) = match &loaded {
        Ok(config) => (config.logging.clone(), config.application.log_level.clone()),
        Err(_) => (
            LoggingConfig {
                local_enabled: false,
                ..LoggingConfig::default()
            },
            "info".to_string(),
        ),
    };
    let log_level = cli.log_level.clone().unwrap_or(config_level);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(exit_code::CONFIGURATION);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Claims Reporting - replication health gate and CSV report export"
    );

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, config_path = %cli.config, "Failed to load configuration");
            eprintln!("❌ Failed to load configuration file {}", cli.config);
            eprintln!("   Error: {e}");
            process::exit(exit_code::CONFIGURATION);
        }
    };

    let exit_code = match execute_command(&cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            exit_code::FATAL
        }
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, config: &ReportingConfig) -> anyhow::Result<i32> {
    match &cli.command {
        None => RunArgs::default().execute(config).await,
        Some(Commands::Run(args)) => args.execute(config).await,
        Some(Commands::CheckReplication(args)) => args.execute(config).await,
        Some(Commands::ValidateConfig(args)) => args.execute(&cli.config, config).await,
    }
}
