use crate::clock::Clock;
use crate::config::AlertsConfig;
use crate::error::ServiceError;
use crate::metrics;
use crate::models::{AlertResult, ERROR_LEVEL};
use crate::store::{with_deadline, LogStore};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Alert parameters as received from a transport
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertRequest {
    /// Trailing window length; defaults to `alerts.default_window_minutes`
    pub minutes: Option<i64>,
    /// Trigger when the count is strictly greater; defaults to `alerts.default_error_threshold`
    pub error_threshold: Option<i64>,
}

/// Error-rate check over a trailing time window
pub struct AlertEvaluator {
    store: Arc<dyn LogStore>,
    clock: Arc<dyn Clock>,
    config: AlertsConfig,
    deadline: Option<Duration>,
}

impl AlertEvaluator {
    pub fn new(store: Arc<dyn LogStore>, clock: Arc<dyn Clock>, config: AlertsConfig) -> Self {
        Self {
            store,
            clock,
            config,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Apply defaults and validate, then [`evaluate`](Self::evaluate)
    pub async fn evaluate_request(
        &self,
        request: &AlertRequest,
    ) -> Result<AlertResult, ServiceError> {
        let window_minutes = match request.minutes {
            None => self.config.default_window_minutes,
            Some(m) if m <= 0 => {
                return Err(ServiceError::Validation(format!(
                    "minutes must be a positive integer, got {}",
                    m
                )));
            }
            Some(m) => u32::try_from(m).map_err(|_| {
                ServiceError::Validation(format!("minutes is too large: {}", m))
            })?,
        };

        let threshold = match request.error_threshold {
            None => self.config.default_error_threshold,
            Some(t) => u64::try_from(t).map_err(|_| {
                ServiceError::Validation(format!(
                    "error_threshold must be a non-negative integer, got {}",
                    t
                ))
            })?,
        };

        self.evaluate(window_minutes, threshold).await
    }

    /// Count ERROR records in `[now - window_minutes, now]` and compare
    ///
    /// `now` is read once and used for both the cutoff and `evaluated_at`.
    /// A store failure is returned as an error, never as "no alert".
    pub async fn evaluate(
        &self,
        window_minutes: u32,
        error_threshold: u64,
    ) -> Result<AlertResult, ServiceError> {
        if window_minutes == 0 {
            return Err(ServiceError::Validation(
                "minutes must be a positive integer".to_string(),
            ));
        }

        let now = self.clock.now();
        let cutoff = window_start(now, window_minutes);

        let error_count = with_deadline(self.deadline, self.store.count_where(ERROR_LEVEL, cutoff))
            .await
            .map_err(|e| {
                error!(error = %e, "Alert check failed");
                ServiceError::Storage(e)
            })?;

        let triggered = error_count > error_threshold;
        metrics::record_alert_evaluation(triggered);

        if triggered {
            warn!(
                error_count,
                window_minutes,
                threshold = error_threshold,
                "High ERROR rate detected"
            );
        } else {
            debug!(error_count, window_minutes, threshold = error_threshold, "Error rate within threshold");
        }

        Ok(AlertResult {
            triggered,
            error_count,
            window_minutes,
            threshold_used: error_threshold,
            evaluated_at: now,
        })
    }
}

fn window_start(now: DateTime<Utc>, window_minutes: u32) -> DateTime<Utc> {
    now.checked_sub_signed(ChronoDuration::minutes(i64::from(window_minutes)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
