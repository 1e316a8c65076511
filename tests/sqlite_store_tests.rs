/// SQLite store behavior against real database files
use chrono::{DateTime, Duration, Utc};
use logflarex::{
    clock::SystemClock,
    config::{Config, DatabaseConfig},
    metrics::ErrorCounter,
    models::{LogQuery, NewLogRecord},
    service::{ListRequest, Services},
    store::{LogStore, SqliteLogStore},
};
use std::sync::Arc;

fn record(level: &str, source: &str, ts: DateTime<Utc>) -> NewLogRecord {
    NewLogRecord {
        timestamp: DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap(),
        level: level.to_string(),
        message: format!("{} event", level),
        source: source.to_string(),
    }
}

async fn file_store(dir: &tempfile::TempDir) -> SqliteLogStore {
    let url = format!("sqlite:{}", dir.path().join("nested/logs.db").display());
    SqliteLogStore::connect(&DatabaseConfig {
        url,
        ..DatabaseConfig::default()
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let now = Utc::now();

    let stored = {
        let store = file_store(&dir).await;
        let stored = store.insert(record("WARNING", "worker", now)).await.unwrap();
        store.close().await;
        stored
    };

    let store = file_store(&dir).await;
    let logs = store
        .query(&LogQuery { limit: 10, ..Default::default() })
        .await
        .unwrap();
    assert_eq!(logs, vec![stored]);
}

#[tokio::test]
async fn test_ids_are_unique_and_increasing() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;
    let now = Utc::now();

    let mut last = 0;
    for _ in 0..5 {
        let stored = store.insert(record("INFO", "api", now)).await.unwrap();
        assert!(stored.id > last);
        last = stored.id;
    }

    // Equal timestamps fall back to id order, newest first
    let logs = store
        .query(&LogQuery { limit: 10, ..Default::default() })
        .await
        .unwrap();
    let ids: Vec<i64> = logs.iter().map(|l| l.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn test_concurrent_appends_are_all_visible() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(file_store(&dir).await);
    let errors = Arc::new(ErrorCounter::new());
    let services = Services::new(store, Arc::new(SystemClock), errors.clone(), &Config::default());

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let logs = services.logs.clone();
            tokio::spawn(async move {
                let level = if i % 2 == 0 { "ERROR" } else { "INFO" };
                logs.append(level, &format!("message {}", i), "load-test").await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in futures::future::join_all(tasks).await {
        ids.push(task.unwrap().unwrap().id);
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 20);
    assert_eq!(errors.get(), 10);

    let request = ListRequest {
        source: Some("load-test".to_string()),
        limit: Some(100),
        ..Default::default()
    };
    let logs = services.query.list(&request).await.unwrap();
    assert_eq!(logs.len(), 20);

    let result = services.alerts.evaluate(5, 9).await.unwrap();
    assert_eq!(result.error_count, 10);
    assert!(result.triggered);
}

#[tokio::test]
async fn test_ordering_across_out_of_order_inserts() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;
    let t0 = Utc::now();

    store.insert(record("INFO", "api", t0 + Duration::seconds(5))).await.unwrap();
    store.insert(record("INFO", "api", t0)).await.unwrap();
    store.insert(record("INFO", "api", t0 + Duration::seconds(10))).await.unwrap();

    let logs = store
        .query(&LogQuery { limit: 10, ..Default::default() })
        .await
        .unwrap();
    for pair in logs.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
    assert_eq!(logs[0].timestamp.timestamp_millis(), (t0 + Duration::seconds(10)).timestamp_millis());
}
