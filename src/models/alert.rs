use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Description attached to a triggered error-rate alert
pub const HIGH_ERROR_RATE: &str = "High ERROR rate detected";

/// Outcome of one alert evaluation; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertResult {
    pub triggered: bool,
    pub error_count: u64,
    pub window_minutes: u32,
    pub threshold_used: u64,
    pub evaluated_at: DateTime<Utc>,
}

impl AlertResult {
    /// The alert to emit, if the threshold was exceeded
    pub fn alert(&self) -> Option<Alert> {
        self.triggered.then(|| Alert {
            alert: HIGH_ERROR_RATE.to_string(),
            error_count: self.error_count,
            time_window_minutes: self.window_minutes,
            trigger_threshold: self.threshold_used,
            timestamp: self.evaluated_at,
        })
    }
}

/// Wire form of a triggered alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub alert: String,
    pub error_count: u64,
    pub time_window_minutes: u32,
    pub trigger_threshold: u64,
    pub timestamp: DateTime<Utc>,
}

/// Response body for `GET /alerts`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertsResponse {
    pub alerts: Vec<Alert>,
}

impl From<&AlertResult> for AlertsResponse {
    fn from(result: &AlertResult) -> Self {
        Self {
            alerts: result.alert().into_iter().collect(),
        }
    }
}
