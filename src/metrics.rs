use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::atomic::{AtomicU64, Ordering};

pub const ERROR_LOGS_TOTAL: &str = "logflarex_error_logs_total";
pub const LOGS_INGESTED_TOTAL: &str = "logflarex_logs_ingested_total";
pub const ALERT_EVALUATIONS_TOTAL: &str = "logflarex_alert_evaluations_total";

/// Install the Prometheus recorder
///
/// Must be called once per process, before any metric is recorded.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(ERROR_LOGS_TOTAL, "Total number of ERROR logs ingested");
    describe_counter!(LOGS_INGESTED_TOTAL, "Total number of logs ingested");
    describe_counter!(
        ALERT_EVALUATIONS_TOTAL,
        "Total number of alert evaluations, by outcome"
    );
    describe_gauge!("logflarex_info", "Service version information");

    gauge!("logflarex_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Cumulative count of ERROR-level ingests since process start
///
/// Built once at startup and handed to the log service. Keeps its own atomic
/// total and mirrors every increment into the installed recorder.
#[derive(Debug, Default)]
pub struct ErrorCounter {
    total: AtomicU64,
}

impl ErrorCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
        counter!(ERROR_LOGS_TOTAL).increment(1);
    }

    pub fn get(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

/// Record a successfully stored log
pub fn record_ingest() {
    counter!(LOGS_INGESTED_TOTAL).increment(1);
}

/// Record the outcome of an alert evaluation
pub fn record_alert_evaluation(triggered: bool) {
    let outcome = if triggered { "true" } else { "false" };
    counter!(ALERT_EVALUATIONS_TOTAL, "triggered" => outcome).increment(1);
}
