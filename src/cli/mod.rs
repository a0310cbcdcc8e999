//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Process exit codes
pub mod exit_code {
    /// Run reached DONE, even if some reports failed
    pub const SUCCESS: i32 = 0;
    /// Configuration could not be loaded or is invalid
    pub const CONFIGURATION: i32 = 2;
    /// Replication health gate rejected the replica
    pub const ABORTED: i32 = 3;
    /// Database could not be reached
    pub const CONNECTION: i32 = 4;
    /// Anything else
    pub const FATAL: i32 = 5;
}

/// Claims Reporting - replication health gate and CSV report export
#[derive(Parser, Debug)]
#[command(name = "claims-reporting")]
#[command(version, about, long_about = None)]
#[command(author = "Claims Reporting Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        default_value = "claims-reporting.toml",
        env = "REPORTING_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "REPORTING_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute; a full run when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check replication health, then export and upload every report
    Run(commands::run::RunArgs),

    /// Check replication health only and print the verdict
    CheckReplication(commands::check::CheckArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}
