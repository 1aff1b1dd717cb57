//! In-memory Match Store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{ChangeKind, MatchId, MatchKey, MatchRecord};
use crate::error::Result;
use crate::port::outbound::store::MatchStore;

/// Match Store backed by an ordered map.
#[derive(Default)]
pub struct MemoryMatchStore {
    records: RwLock<BTreeMap<MatchKey, MatchRecord>>,
}

impl MemoryMatchStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for MemoryMatchStore {
    async fn put(&self, record: &MatchRecord) -> Result<ChangeKind> {
        record.validate()?;
        let previous = self.records.write().insert(record.key(), record.clone());
        Ok(if previous.is_some() {
            ChangeKind::Modify
        } else {
            ChangeKind::Insert
        })
    }

    async fn delete(&self, key: &MatchKey) -> Result<bool> {
        Ok(self.records.write().remove(key).is_some())
    }

    async fn get(&self, key: &MatchKey) -> Result<Option<MatchRecord>> {
        Ok(self.records.read().get(key).cloned())
    }

    async fn list_match(&self, match_id: &MatchId) -> Result<Vec<MatchRecord>> {
        Ok(self
            .records
            .read()
            .values()
            .filter(|r| &r.match_id == match_id)
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<MatchRecord>> {
        Ok(self.records.read().values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_reports_insert_then_modify() {
        let store = MemoryMatchStore::new();
        let record = MatchRecord::new(MatchKey::new("m1", "t1"), "Alpha", "Beta", "goal");

        assert_eq!(store.put(&record).await.unwrap(), ChangeKind::Insert);
        assert_eq!(store.put(&record).await.unwrap(), ChangeKind::Modify);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_match_filters_by_match() {
        let store = MemoryMatchStore::new();
        for (m, t) in [("m1", "t2"), ("m2", "t1"), ("m1", "t1")] {
            let record = MatchRecord::new(MatchKey::new(m, t), "Alpha", "Beta", "foul");
            store.put(&record).await.unwrap();
        }

        let revisions = store.list_match(&MatchId::new("m1")).await.unwrap();
        let stamps: Vec<_> = revisions.iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(stamps, vec!["t1", "t2"]);
    }
}
