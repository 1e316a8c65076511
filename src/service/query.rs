use crate::config::QueryConfig;
use crate::error::ServiceError;
use crate::models::{LogQuery, LogRecord};
use crate::store::{with_deadline, LogStore};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Caller-supplied list criteria, as received from a transport
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRequest {
    /// Exact level match (case-sensitive)
    pub level: Option<String>,
    /// Exact source match
    pub source: Option<String>,
    /// Maximum number of records; defaults to `query.default_limit`
    pub limit: Option<i64>,
}

/// Read path for filtered, most-recent-first retrieval
pub struct QueryEngine {
    store: Arc<dyn LogStore>,
    config: QueryConfig,
    deadline: Option<Duration>,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn LogStore>, config: QueryConfig) -> Self {
        Self {
            store,
            config,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Turn request criteria into a concrete store query
    ///
    /// Empty filters count as absent. A non-positive limit is rejected and a
    /// limit above `max_limit` is clamped to it.
    pub fn resolve(&self, request: &ListRequest) -> Result<LogQuery, ServiceError> {
        let limit = match request.limit {
            None => self.config.default_limit as usize,
            Some(n) if n <= 0 => {
                return Err(ServiceError::Validation(format!(
                    "limit must be a positive integer, got {}",
                    n
                )));
            }
            Some(n) => {
                let max = i64::from(self.config.max_limit);
                if n > max {
                    debug!(requested = n, max_limit = max, "Clamping list limit");
                }
                n.min(max) as usize
            }
        };

        Ok(LogQuery {
            level: non_empty(request.level.as_deref()),
            source: non_empty(request.source.as_deref()),
            limit,
        })
    }

    /// Records matching all filters, newest first, at most `limit` of them
    pub async fn list(&self, request: &ListRequest) -> Result<Vec<LogRecord>, ServiceError> {
        let query = self.resolve(request)?;

        let records = with_deadline(self.deadline, self.store.query(&query))
            .await
            .map_err(|e| {
                error!(error = %e, "Log query failed");
                ServiceError::Storage(e)
            })?;

        debug!(
            level = ?query.level,
            source = ?query.source,
            limit = query.limit,
            returned = records.len(),
            "Log query served"
        );
        Ok(records)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewLogRecord;
    use crate::store::InMemoryLogStore;
    use chrono::{DateTime, Duration as ChronoDuration};

    fn engine(store: Arc<InMemoryLogStore>) -> QueryEngine {
        QueryEngine::new(store, QueryConfig::default())
    }

    fn request(level: Option<&str>, source: Option<&str>, limit: Option<i64>) -> ListRequest {
        ListRequest {
            level: level.map(str::to_string),
            source: source.map(str::to_string),
            limit,
        }
    }

    async fn seed(store: &InMemoryLogStore, entries: &[(&str, &str)]) {
        let t0 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        for (i, (level, source)) in entries.iter().enumerate() {
            store
                .insert(NewLogRecord {
                    timestamp: t0 + ChronoDuration::seconds(i as i64),
                    level: level.to_string(),
                    message: format!("entry {}", i),
                    source: source.to_string(),
                })
                .await
                .unwrap();
        }
    }

    #[test]
    fn test_resolve_defaults_and_clamps() {
        let engine = engine(Arc::new(InMemoryLogStore::new()));

        assert_eq!(engine.resolve(&ListRequest::default()).unwrap().limit, 50);
        assert_eq!(engine.resolve(&request(None, None, Some(7))).unwrap().limit, 7);
        assert_eq!(engine.resolve(&request(None, None, Some(1_000_000))).unwrap().limit, 1000);
    }

    #[test]
    fn test_resolve_rejects_non_positive_limit() {
        let engine = engine(Arc::new(InMemoryLogStore::new()));

        for limit in [0, -1] {
            let err = engine.resolve(&request(None, None, Some(limit))).unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        }
    }

    #[test]
    fn test_resolve_treats_empty_filters_as_absent() {
        let engine = engine(Arc::new(InMemoryLogStore::new()));
        let query = engine.resolve(&request(Some(""), Some(""), None)).unwrap();
        assert_eq!(query.level, None);
        assert_eq!(query.source, None);
    }

    #[tokio::test]
    async fn test_list_filters_by_level_and_source() {
        let store = Arc::new(InMemoryLogStore::new());
        seed(
            &store,
            &[("INFO", "api"), ("ERROR", "api"), ("ERROR", "worker"), ("INFO", "worker")],
        )
        .await;
        let engine = engine(store);

        let errors = engine.list(&request(Some("ERROR"), None, None)).await.unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|r| r.level == "ERROR"));

        let both = engine
            .list(&request(Some("ERROR"), Some("worker"), None))
            .await
            .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].source, "worker");
    }

    #[tokio::test]
    async fn test_list_returns_most_recent_within_limit() {
        let store = Arc::new(InMemoryLogStore::new());
        seed(&store, &[("INFO", "api"); 5]).await;
        let engine = engine(store);

        let logs = engine.list(&request(None, None, Some(2))).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "entry 4");
        assert_eq!(logs[1].message, "entry 3");
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let engine = engine(Arc::new(InMemoryLogStore::new()));
        assert!(engine.list(&ListRequest::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_surfaces_storage_failure() {
        let store = Arc::new(InMemoryLogStore::new());
        store.set_unavailable(true);
        let engine = engine(store);

        let err = engine.list(&ListRequest::default()).await.unwrap_err();
        assert!(err.is_storage_failure());
    }
}
