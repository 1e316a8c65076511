//! Command implementations for the CLI
//!
//! - start: Run the HTTP server
//! - test: Validate configuration
//! - logs: Query stored logs
//! - alerts: Evaluate the error-rate alert

pub mod alerts;
pub mod logs;
pub mod start;

use anyhow::{Context, Result};
use logflarex::clock::SystemClock;
use logflarex::config::Config;
use logflarex::metrics::ErrorCounter;
use logflarex::service::Services;
use logflarex::store::SqliteLogStore;
use std::sync::Arc;

/// Services backed by the configured store, for one-shot commands
async fn open_services(cfg: &Config) -> Result<(Services, Arc<SqliteLogStore>)> {
    let store = Arc::new(
        SqliteLogStore::connect(&cfg.database)
            .await
            .with_context(|| format!("Failed to open log store at {}", cfg.database.url))?,
    );

    let services = Services::new(
        store.clone(),
        Arc::new(SystemClock),
        Arc::new(ErrorCounter::new()),
        cfg,
    );

    Ok((services, store))
}
