use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Level token that classifies a record as an error
pub const ERROR_LEVEL: &str = "ERROR";

/// A persisted log record
///
/// Immutable once the store has assigned its `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Store-assigned, unique, monotonically increasing
    pub id: i64,
    /// Creation instant (UTC, millisecond precision)
    pub timestamp: DateTime<Utc>,
    /// Severity token as submitted (e.g. INFO, WARNING, ERROR)
    pub level: String,
    pub message: String,
    /// Emitter identifier (e.g. api-server)
    pub source: String,
}

impl LogRecord {
    /// Whether this record counts as an error for metrics and alerting
    pub fn is_error(&self) -> bool {
        is_error_level(&self.level)
    }
}

/// Case-insensitive check against [`ERROR_LEVEL`]
pub fn is_error_level(level: &str) -> bool {
    level.eq_ignore_ascii_case(ERROR_LEVEL)
}

/// A record that has been validated and timestamped but not yet stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub message: String,
    pub source: String,
}

impl NewLogRecord {
    /// Attach the store-assigned id
    pub fn with_id(self, id: i64) -> LogRecord {
        LogRecord {
            id,
            timestamp: self.timestamp,
            level: self.level,
            message: self.message,
            source: self.source,
        }
    }
}

/// Request body for `POST /logs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogRequest {
    pub level: String,
    pub message: String,
    pub source: String,
}

/// Resolved store query: exact-match filters plus a concrete limit
///
/// Results are always ordered by `timestamp DESC, id DESC`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub level: Option<String>,
    pub source: Option<String>,
    pub limit: usize,
}

impl LogQuery {
    /// Whether a record satisfies every supplied filter
    pub fn matches(&self, record: &LogRecord) -> bool {
        if let Some(level) = &self.level {
            if &record.level != level {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if &record.source != source {
                return false;
            }
        }
        true
    }
}

/// Drop sub-millisecond precision so the value survives a storage round trip
pub fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(level: &str, source: &str) -> LogRecord {
        LogRecord {
            id: 1,
            timestamp: Utc::now(),
            level: level.to_string(),
            message: "msg".to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_is_error_level_ignores_case() {
        assert!(is_error_level("ERROR"));
        assert!(is_error_level("error"));
        assert!(is_error_level("Error"));
        assert!(!is_error_level("ERRORS"));
        assert!(!is_error_level("WARNING"));
    }

    #[test]
    fn test_query_matches_is_exact() {
        let query = LogQuery {
            level: Some("ERROR".to_string()),
            source: None,
            limit: 10,
        };
        assert!(query.matches(&record("ERROR", "api")));
        assert!(!query.matches(&record("error", "api")));
    }

    #[test]
    fn test_query_matches_intersection() {
        let query = LogQuery {
            level: Some("INFO".to_string()),
            source: Some("worker".to_string()),
            limit: 10,
        };
        assert!(query.matches(&record("INFO", "worker")));
        assert!(!query.matches(&record("INFO", "api")));
        assert!(!query.matches(&record("ERROR", "worker")));
        assert!(LogQuery::default().matches(&record("ANYTHING", "anywhere")));
    }

    #[test]
    fn test_truncate_to_millis() {
        let ts = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        let truncated = truncate_to_millis(ts);
        assert_eq!(truncated.timestamp_subsec_nanos(), 123_000_000);
        assert_eq!(truncated.timestamp_millis(), ts.timestamp_millis());
    }

    #[test]
    fn test_record_serializes_expected_fields() {
        let json = serde_json::to_value(record("INFO", "api")).unwrap();
        for field in ["id", "timestamp", "level", "message", "source"] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
    }
}
