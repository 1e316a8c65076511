//! SQLite store backed by an sqlx connection pool
//!
//! - WAL mode so readers never block the single writer
//! - Embedded migrations run on connect
//! - Every call acquires a pooled connection (or a transaction for inserts);
//!   dropping the guard returns it to the pool, rolling back if uncommitted

use super::{LogStore, StoreResult};
use crate::config::DatabaseConfig;
use crate::error::StorageError;
use crate::models::{LogQuery, LogRecord, NewLogRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{QueryBuilder, Row, Sqlite};
use std::str::FromStr;
use std::time::Duration;

const SELECT_COLUMNS: &str = "SELECT id, timestamp, level, message, source FROM logs";

pub struct SqliteLogStore {
    pool: SqlitePool,
}

impl SqliteLogStore {
    /// Connect with default pool settings
    ///
    /// ```ignore
    /// let store = SqliteLogStore::new("sqlite:./data/logflarex.db").await?;
    /// ```
    pub async fn new(database_url: &str) -> StoreResult<Self> {
        Self::connect(&DatabaseConfig {
            url: database_url.to_string(),
            ..DatabaseConfig::default()
        })
        .await
    }

    /// Open the pool described by `cfg` and bring the schema up to date
    pub async fn connect(cfg: &DatabaseConfig) -> StoreResult<Self> {
        let in_memory = is_in_memory(&cfg.url);

        let options = SqliteConnectOptions::from_str(&cfg.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(cfg.acquire_timeout_seconds))
            .pragma("synchronous", "NORMAL");

        if !in_memory {
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| StorageError::Unavailable(e.to_string()))?;
                }
            }
        }

        // Each connection to `:memory:` is its own database, so keep exactly one
        // and never let it expire.
        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_seconds));
        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(cfg.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(url = %cfg.url, "Log store ready");

        Ok(Self { pool })
    }

    /// Close every pooled connection, waiting for in-flight calls
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl LogStore for SqliteLogStore {
    async fn insert(&self, record: NewLogRecord) -> StoreResult<LogRecord> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO logs (timestamp, level, message, source) VALUES (?, ?, ?, ?)",
        )
        .bind(record.timestamp.timestamp_millis())
        .bind(&record.level)
        .bind(&record.message)
        .bind(&record.source)
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();
        tx.commit().await?;

        Ok(record.with_id(id))
    }

    async fn query(&self, query: &LogQuery) -> StoreResult<Vec<LogRecord>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_COLUMNS);
        builder.push(" WHERE 1=1");

        if let Some(level) = &query.level {
            builder.push(" AND level = ").push_bind(level.as_str());
        }
        if let Some(source) = &query.source {
            builder.push(" AND source = ").push_bind(source.as_str());
        }

        builder
            .push(" ORDER BY timestamp DESC, id DESC LIMIT ")
            .push_bind(i64::try_from(query.limit).unwrap_or(i64::MAX));

        let mut conn = self.pool.acquire().await?;
        let rows = builder.build().fetch_all(&mut *conn).await?;

        rows.iter().map(decode_row).collect()
    }

    async fn count_where(&self, level: &str, from: DateTime<Utc>) -> StoreResult<u64> {
        let mut conn = self.pool.acquire().await?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM logs WHERE level = ? COLLATE NOCASE AND timestamp >= ?",
        )
        .bind(level)
        .bind(from.timestamp_millis())
        .fetch_one(&mut *conn)
        .await?;

        Ok(count.max(0) as u64)
    }
}

fn decode_row(row: &SqliteRow) -> StoreResult<LogRecord> {
    let id: i64 = row.try_get("id")?;
    let millis: i64 = row.try_get("timestamp")?;
    let timestamp = DateTime::from_timestamp_millis(millis).ok_or_else(|| StorageError::Corrupt {
        id,
        reason: format!("timestamp {} out of range", millis),
    })?;

    Ok(LogRecord {
        id,
        timestamp,
        level: row.try_get("level")?,
        message: row.try_get("message")?,
        source: row.try_get("source")?,
    })
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    async fn create_test_store() -> SqliteLogStore {
        SqliteLogStore::new("sqlite::memory:").await.unwrap()
    }

    fn new_record(level: &str, source: &str, ts: DateTime<Utc>) -> NewLogRecord {
        NewLogRecord {
            timestamp: crate::models::log::truncate_to_millis(ts),
            level: level.to_string(),
            message: "Test message".to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:logs?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite:./data/logflarex.db"));
    }

    #[tokio::test]
    async fn test_insert_and_query_round_trip() {
        let store = create_test_store().await;
        let record = new_record("INFO", "api-server", Utc::now());

        let stored = store.insert(record.clone()).await.unwrap();
        assert!(stored.id > 0);

        let query = LogQuery { limit: 10, ..Default::default() };
        let logs = store.query(&query).await.unwrap();
        assert_eq!(logs, vec![stored]);
        assert_eq!(logs[0].timestamp, record.timestamp);
    }

    #[tokio::test]
    async fn test_query_filters_and_orders() {
        let store = create_test_store().await;
        let t0 = Utc::now();

        for (i, (level, source)) in [
            ("INFO", "api"),
            ("ERROR", "api"),
            ("ERROR", "worker"),
            ("ERROR", "api"),
        ]
        .into_iter()
        .enumerate()
        {
            store
                .insert(new_record(level, source, t0 + ChronoDuration::seconds(i as i64)))
                .await
                .unwrap();
        }

        let query = LogQuery {
            level: Some("ERROR".to_string()),
            source: Some("api".to_string()),
            limit: 50,
        };
        let logs = store.query(&query).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs[0].timestamp > logs[1].timestamp);
        assert!(logs.iter().all(|l| l.level == "ERROR" && l.source == "api"));

        let limited = store.query(&LogQuery { limit: 1, ..Default::default() }).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].timestamp, crate::models::log::truncate_to_millis(t0 + ChronoDuration::seconds(3)));
    }

    #[tokio::test]
    async fn test_level_filter_is_case_sensitive() {
        let store = create_test_store().await;
        store.insert(new_record("error", "api", Utc::now())).await.unwrap();

        let query = LogQuery {
            level: Some("ERROR".to_string()),
            source: None,
            limit: 50,
        };
        assert!(store.query(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_where() {
        let store = create_test_store().await;
        let now = Utc::now();

        store.insert(new_record("ERROR", "api", now - ChronoDuration::minutes(30))).await.unwrap();
        store.insert(new_record("ERROR", "api", now)).await.unwrap();
        store.insert(new_record("Error", "api", now)).await.unwrap();
        store.insert(new_record("INFO", "api", now)).await.unwrap();

        let count = store
            .count_where("ERROR", now - ChronoDuration::minutes(5))
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_closed_pool_reports_unavailable() {
        let store = create_test_store().await;
        store.close().await;

        let err = store.insert(new_record("INFO", "api", Utc::now())).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
    }
}
