//! Durable storage for log records
//!
//! The services only see the [`LogStore`] trait. Two implementations:
//! - [`SqliteLogStore`]: sqlx connection pool, WAL mode, embedded migrations
//! - [`InMemoryLogStore`]: reference implementation used in tests
//!
//! Isolation is the store's job: an insert is either fully visible or not
//! visible at all to a concurrent query or count.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryLogStore;
pub use sqlite::SqliteLogStore;

use crate::error::StorageError;
use crate::models::{LogQuery, LogRecord, NewLogRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;

pub type StoreResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait LogStore: Send + Sync + 'static {
    /// Atomically persist a record and assign it a fresh id
    async fn insert(&self, record: NewLogRecord) -> StoreResult<LogRecord>;

    /// Records matching every filter, `timestamp DESC, id DESC`, at most `query.limit`
    async fn query(&self, query: &LogQuery) -> StoreResult<Vec<LogRecord>>;

    /// Number of records whose level equals `level` (ASCII case-insensitive)
    /// and whose timestamp is at or after `from`
    async fn count_where(&self, level: &str, from: DateTime<Utc>) -> StoreResult<u64>;
}

/// Run a store call under an optional deadline
///
/// On expiry the call is dropped (rolling back any open transaction) and a
/// [`StorageError::Timeout`] is returned.
pub async fn with_deadline<T, F>(deadline: Option<Duration>, call: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| StorageError::Timeout(limit))?,
        None => call.await,
    }
}
