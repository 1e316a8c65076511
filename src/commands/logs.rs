//! Logs query command
//!
//! Run the query engine against the configured store and print the results.

use anyhow::Result;
use colored::Colorize;
use logflarex::config::Config;
use logflarex::models::LogRecord;
use logflarex::service::ListRequest;

use crate::cli::LogsArgs;

/// Execute the logs command
pub async fn execute(cfg: &Config, args: LogsArgs) -> Result<()> {
    let (services, store) = super::open_services(cfg).await?;

    let request = ListRequest {
        level: args.level,
        source: args.source,
        limit: args.limit,
    };
    let logs = services.query.list(&request).await;
    store.close().await;
    let logs = logs?;

    if logs.is_empty() {
        println!("{}", "No logs found matching the criteria".yellow());
        return Ok(());
    }

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&logs)?),
        _ => display_logs_text(&logs),
    }

    Ok(())
}

/// Display logs in human-friendly text format
fn display_logs_text(logs: &[LogRecord]) {
    for log in logs {
        let timestamp = log.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        println!(
            "{} {} {:>5} {} {}",
            timestamp.to_string().dimmed(),
            format!("#{}", log.id).dimmed(),
            colorize_level(&log.level),
            format!("[{}]", log.source).cyan(),
            log.message
        );
    }

    println!();
    println!("{} {} log(s)", "Total:".bold(), logs.len());
}

fn colorize_level(level: &str) -> colored::ColoredString {
    match level.to_ascii_uppercase().as_str() {
        "ERROR" => level.red().bold(),
        "WARN" | "WARNING" => level.yellow(),
        "INFO" => level.green(),
        "DEBUG" | "TRACE" => level.blue(),
        _ => level.normal(),
    }
}
