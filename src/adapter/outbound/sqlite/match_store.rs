//! SQLite match record store implementation.

use async_trait::async_trait;
use diesel::prelude::*;

use crate::adapter::outbound::sqlite::database::connection::{pool_error, query_error, DbPool};
use crate::adapter::outbound::sqlite::database::model::MatchRow;
use crate::adapter::outbound::sqlite::database::schema::matches;
use crate::domain::{ChangeKind, MatchId, MatchKey, MatchRecord, TeamName, Timestamp};
use crate::error::{Result, StoreError};
use crate::port::outbound::store::MatchStore;

/// SQLite-backed Match Store.
pub struct SqliteMatchStore {
    pool: DbPool,
}

impl SqliteMatchStore {
    /// Create a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(record: &MatchRecord) -> Result<MatchRow> {
        Ok(MatchRow {
            match_id: record.match_id.to_string(),
            timestamp: record.timestamp.to_string(),
            team: record.team.to_string(),
            opponent: record.opponent.to_string(),
            event_type: record.event_type.clone(),
            event_details: serde_json::to_string(&record.event_details)?,
        })
    }

    fn from_row(row: MatchRow) -> Result<MatchRecord> {
        let event_details = serde_json::from_str(&row.event_details).map_err(|e| {
            StoreError::Permanent(format!(
                "corrupt event_details for {}/{}: {e}",
                row.match_id, row.timestamp
            ))
        })?;

        Ok(MatchRecord {
            match_id: MatchId::new(row.match_id),
            timestamp: Timestamp::new(row.timestamp),
            team: TeamName::new(row.team),
            opponent: TeamName::new(row.opponent),
            event_type: row.event_type,
            event_details,
        })
    }
}

#[async_trait]
impl MatchStore for SqliteMatchStore {
    async fn put(&self, record: &MatchRecord) -> Result<ChangeKind> {
        record.validate()?;
        let row = Self::to_row(record)?;
        let mut conn = self.pool.get().map_err(pool_error)?;

        let existed = conn
            .immediate_transaction(|conn| {
                let existing: Option<MatchRow> = matches::table
                    .find((&row.match_id, &row.timestamp))
                    .first(conn)
                    .optional()?;

                diesel::replace_into(matches::table)
                    .values(&row)
                    .execute(conn)?;

                Ok::<_, diesel::result::Error>(existing.is_some())
            })
            .map_err(query_error)?;

        Ok(if existed {
            ChangeKind::Modify
        } else {
            ChangeKind::Insert
        })
    }

    async fn delete(&self, key: &MatchKey) -> Result<bool> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let deleted = diesel::delete(
            matches::table.find((key.match_id.as_str(), key.timestamp.as_str())),
        )
        .execute(&mut conn)
        .map_err(query_error)?;

        Ok(deleted > 0)
    }

    async fn get(&self, key: &MatchKey) -> Result<Option<MatchRecord>> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let row: Option<MatchRow> = matches::table
            .find((key.match_id.as_str(), key.timestamp.as_str()))
            .first(&mut conn)
            .optional()
            .map_err(query_error)?;

        row.map(Self::from_row).transpose()
    }

    async fn list_match(&self, match_id: &MatchId) -> Result<Vec<MatchRecord>> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let rows: Vec<MatchRow> = matches::table
            .filter(matches::match_id.eq(match_id.as_str()))
            .order(matches::timestamp.asc())
            .load(&mut conn)
            .map_err(query_error)?;

        rows.into_iter().map(Self::from_row).collect()
    }

    async fn list(&self) -> Result<Vec<MatchRecord>> {
        let mut conn = self.pool.get().map_err(pool_error)?;

        let rows: Vec<MatchRow> = matches::table
            .order((matches::match_id.asc(), matches::timestamp.asc()))
            .load(&mut conn)
            .map_err(query_error)?;

        rows.into_iter().map(Self::from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::open;
    use crate::error::Error;
    use serde_json::json;

    fn store() -> SqliteMatchStore {
        SqliteMatchStore::new(open(":memory:").expect("open sqlite"))
    }

    fn goal(match_id: &str, timestamp: &str) -> MatchRecord {
        MatchRecord::new(MatchKey::new(match_id, timestamp), "Alpha", "Beta", "goal")
            .with_details(json!({"player": {"name": "Ada"}, "minute": 12}))
    }

    #[tokio::test]
    async fn first_put_is_insert_second_is_modify() {
        let store = store();
        let record = goal("m1", "t1");

        assert_eq!(store.put(&record).await.unwrap(), ChangeKind::Insert);
        assert_eq!(store.put(&record).await.unwrap(), ChangeKind::Modify);
    }

    #[tokio::test]
    async fn get_returns_stored_details() {
        let store = store();
        let record = goal("m1", "t1");
        store.put(&record).await.unwrap();

        let loaded = store.get(&record.key()).await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn list_match_orders_by_timestamp() {
        let store = store();
        store.put(&goal("m1", "t2")).await.unwrap();
        store.put(&goal("m1", "t1")).await.unwrap();
        store.put(&goal("m2", "t1")).await.unwrap();

        let revisions = store.list_match(&MatchId::new("m1")).await.unwrap();
        let stamps: Vec<_> = revisions.iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(stamps, vec!["t1", "t2"]);

        assert_eq!(store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let store = store();
        let record = goal("m1", "t1");
        store.put(&record).await.unwrap();

        assert!(store.delete(&record.key()).await.unwrap());
        assert!(!store.delete(&record.key()).await.unwrap());
        assert!(store.get(&record.key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_rejects_missing_key_fields() {
        let store = store();
        let record = goal("m1", "");

        let err = store.put(&record).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(store.list().await.unwrap().is_empty());
    }
}
