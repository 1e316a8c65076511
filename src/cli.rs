use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "logflarex", version, about = "LogflareX log ingestion and alerting service")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server (default)
    Start,

    /// Test configuration file validity
    Test,

    /// Query stored logs
    Logs(LogsArgs),

    /// Evaluate the error-rate alert once
    Alerts(AlertsArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct LogsArgs {
    /// Filter by log level (exact match)
    #[arg(short, long)]
    pub level: Option<String>,

    /// Filter by source (exact match)
    #[arg(short, long)]
    pub source: Option<String>,

    /// Maximum number of results
    #[arg(short = 'n', long)]
    pub limit: Option<i64>,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    pub format: String,
}

#[derive(Args, Debug, Clone)]
pub struct AlertsArgs {
    /// Trailing window in minutes
    #[arg(short, long)]
    pub minutes: Option<i64>,

    /// Alert when the ERROR count exceeds this
    #[arg(short = 't', long)]
    pub error_threshold: Option<i64>,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    pub format: String,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}
