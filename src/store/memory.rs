use super::{LogStore, StoreResult};
use crate::error::StorageError;
use crate::models::{LogQuery, LogRecord, NewLogRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    records: Vec<LogRecord>,
    next_id: i64,
}

/// Process-local store
///
/// A single `RwLock` covers both the records and the id sequence, so an insert
/// is visible to readers only once it is complete. Can be flipped into an
/// unavailable state or given artificial latency to exercise failure paths.
#[derive(Debug, Default)]
pub struct InMemoryLogStore {
    inner: RwLock<Inner>,
    unavailable: AtomicBool,
    latency: Option<Duration>,
}

impl InMemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every operation by `latency` before touching the data
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Make every subsequent call fail with [`StorageError::Unavailable`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn check(&self) -> StoreResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("in-memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LogStore for InMemoryLogStore {
    async fn insert(&self, record: NewLogRecord) -> StoreResult<LogRecord> {
        self.check().await?;

        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let stored = record.with_id(inner.next_id);
        inner.records.push(stored.clone());
        Ok(stored)
    }

    async fn query(&self, query: &LogQuery) -> StoreResult<Vec<LogRecord>> {
        self.check().await?;

        let inner = self.inner.read().await;
        let mut matched: Vec<LogRecord> = inner
            .records
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        matched.truncate(query.limit);
        Ok(matched)
    }

    async fn count_where(&self, level: &str, from: DateTime<Utc>) -> StoreResult<u64> {
        self.check().await?;

        let inner = self.inner.read().await;
        let count = inner
            .records
            .iter()
            .filter(|r| r.level.eq_ignore_ascii_case(level) && r.timestamp >= from)
            .count();
        Ok(count as u64)
    }
}
