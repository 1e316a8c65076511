use super::require_non_empty;
use crate::clock::Clock;
use crate::error::ServiceError;
use crate::metrics::{self, ErrorCounter};
use crate::models::log::{is_error_level, truncate_to_millis};
use crate::models::{LogRecord, NewLogRecord};
use crate::store::{with_deadline, LogStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Write path: validate, timestamp, persist, then count
pub struct LogService {
    store: Arc<dyn LogStore>,
    clock: Arc<dyn Clock>,
    error_counter: Arc<ErrorCounter>,
    deadline: Option<Duration>,
}

impl LogService {
    pub fn new(
        store: Arc<dyn LogStore>,
        clock: Arc<dyn Clock>,
        error_counter: Arc<ErrorCounter>,
    ) -> Self {
        Self {
            store,
            clock,
            error_counter,
            deadline: None,
        }
    }

    /// Deadline applied to the store insert
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Append a record and return it with its id and timestamp
    ///
    /// The error counter moves only after the insert has committed; a failed
    /// insert leaves both the store and the counter untouched.
    pub async fn append(
        &self,
        level: &str,
        message: &str,
        source: &str,
    ) -> Result<LogRecord, ServiceError> {
        require_non_empty("level", level)?;
        require_non_empty("message", message)?;
        require_non_empty("source", source)?;

        let record = NewLogRecord {
            timestamp: truncate_to_millis(self.clock.now()),
            level: level.to_string(),
            message: message.to_string(),
            source: source.to_string(),
        };

        let stored = with_deadline(self.deadline, self.store.insert(record))
            .await
            .map_err(|e| {
                error!(error = %e, level = %level, source = %source, "Failed to store log");
                ServiceError::Storage(e)
            })?;

        metrics::record_ingest();
        if is_error_level(&stored.level) {
            self.error_counter.increment();
        }

        info!(id = stored.id, level = %stored.level, source = %stored.source, "Log stored");
        Ok(stored)
    }

    pub fn error_counter(&self) -> &ErrorCounter {
        &self.error_counter
    }
}
