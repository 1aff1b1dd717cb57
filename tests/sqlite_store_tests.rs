//! SQLite-backed stores on real database files.

mod harness;
mod support;

use std::sync::Arc;

use harness::temp_db::TempDb;
use matchstats::adapter::outbound::sqlite::match_store::SqliteMatchStore;
use matchstats::adapter::outbound::sqlite::statistics_store::SqliteStatisticsStore;
use matchstats::domain::{ChangeKind, MatchId, MatchResult, TeamName};
use matchstats::infrastructure::bootstrap::{open_stores, Stores};
use matchstats::infrastructure::config::storage::{StorageBackend, StorageConfig};
use matchstats::port::outbound::store::{MatchStore, StatisticsStore};
use matchstats::testkit::domain::{goal, result};
use serde_json::json;
use support::pipeline::{submission, Harness};

fn sqlite_stores(db: &TempDb) -> Stores {
    Stores {
        matches: Arc::new(SqliteMatchStore::new(db.pool("matches"))),
        statistics: Arc::new(SqliteStatisticsStore::new(db.pool("statistics"))),
    }
}

#[tokio::test]
async fn match_records_survive_reopen() {
    let db = TempDb::create();
    let record = goal("m1", "t1", "Alpha", "Beta");
    {
        let store = SqliteMatchStore::new(db.pool("matches"));
        assert_eq!(store.put(&record).await.unwrap(), ChangeKind::Insert);
        assert_eq!(store.put(&record).await.unwrap(), ChangeKind::Modify);
    }

    let reopened = SqliteMatchStore::new(db.pool("matches"));
    let stored = reopened.get(&record.key()).await.unwrap().unwrap();
    assert_eq!(stored, record);
    assert_eq!(reopened.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn revisions_list_in_timestamp_order() {
    let db = TempDb::create();
    let store = SqliteMatchStore::new(db.pool("matches"));
    for timestamp in ["t3", "t1", "t2"] {
        store.put(&goal("m1", timestamp, "Alpha", "Beta")).await.unwrap();
    }
    store.put(&goal("m0", "t9", "Gamma", "Delta")).await.unwrap();

    let timestamps: Vec<String> = store
        .list_match(&MatchId::new("m1"))
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.timestamp.to_string())
        .collect();
    assert_eq!(timestamps, ["t1", "t2", "t3"]);

    let all = store.list().await.unwrap();
    assert_eq!(all.first().unwrap().match_id.as_str(), "m0");
}

#[tokio::test]
async fn delete_reports_whether_the_key_existed() {
    let db = TempDb::create();
    let store = SqliteMatchStore::new(db.pool("matches"));
    let record = goal("m1", "t1", "Alpha", "Beta");
    store.put(&record).await.unwrap();

    assert!(store.delete(&record.key()).await.unwrap());
    assert!(!store.delete(&record.key()).await.unwrap());
    assert!(store.get(&record.key()).await.unwrap().is_none());
}

#[tokio::test]
async fn full_pipeline_on_sqlite() {
    let db = TempDb::create();
    let harness = Harness::with_stores(sqlite_stores(&db));

    harness
        .ingest(submission("m1", "t1", "Alpha", "Beta", "goal", json!({})))
        .await;
    harness
        .ingest(submission("m1", "t2", "Alpha", "Beta", "result", json!({"winner": "Alpha"})))
        .await;
    harness
        .ingest(submission("m1", "t2", "Alpha", "Beta", "result", json!({"winner": "Alpha"})))
        .await;
    let stats = harness.drain().await;
    assert_eq!(stats.received, 3);
    assert_eq!(stats.failed, 0);

    let statistics = SqliteStatisticsStore::new(db.pool("statistics"));
    let alpha = statistics
        .get(&TeamName::new("Alpha"), &MatchId::new("m1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alpha.goals_scored, 1);
    assert_eq!(alpha.result, MatchResult::Win);
    assert_eq!(alpha.contributions.len(), 2);

    let beta_rows = statistics.list_team(&TeamName::new("Beta")).await.unwrap();
    assert_eq!(beta_rows.len(), 1);
    assert_eq!(beta_rows[0].result, MatchResult::Loss);
}

#[tokio::test]
async fn open_stores_creates_both_databases() {
    let db = TempDb::create();
    let config = StorageConfig {
        backend: StorageBackend::Sqlite,
        match_store: db.url("matches"),
        statistics_store: db.url("statistics"),
    };

    let stores = open_stores(&config).unwrap();
    stores
        .matches
        .put(&result("m1", "t1", "Alpha", "Beta", None))
        .await
        .unwrap();

    assert!(db.path("matches").exists());
    assert!(db.path("statistics").exists());
    assert!(stores
        .statistics
        .list_team(&TeamName::new("Alpha"))
        .await
        .unwrap()
        .is_empty());
}
