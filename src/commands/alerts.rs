use anyhow::Result;
use colored::Colorize;
use logflarex::config::Config;
use logflarex::models::AlertsResponse;
use logflarex::service::AlertRequest;

use crate::cli::AlertsArgs;

/// Execute the alerts command
pub async fn execute(cfg: &Config, args: AlertsArgs) -> Result<()> {
    let (services, store) = super::open_services(cfg).await?;

    let request = AlertRequest {
        minutes: args.minutes,
        error_threshold: args.error_threshold,
    };
    let result = services.alerts.evaluate_request(&request).await;
    store.close().await;
    let result = result?;

    if args.format == "json" {
        let response = AlertsResponse::from(&result);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let summary = format!(
        "{} ERROR log(s) in the last {} minute(s) (threshold {})",
        result.error_count, result.window_minutes, result.threshold_used
    );

    match result.alert() {
        Some(alert) => println!("{} {}", format!("ALERT: {}", alert.alert).red().bold(), summary),
        None => println!("{} {}", "OK:".green().bold(), summary),
    }

    Ok(())
}
