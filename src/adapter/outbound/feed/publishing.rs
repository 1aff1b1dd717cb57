//! Match Store decorator that publishes every successful write.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::log::ChangeLog;
use crate::domain::{ChangeKind, MatchId, MatchKey, MatchRecord};
use crate::error::Result;
use crate::port::outbound::store::MatchStore;

/// Wraps a [`MatchStore`] so writes land on a [`ChangeLog`].
///
/// Puts carry the record as their new image; deletes carry none. Writes
/// are serialized so the log order matches the store's commit order.
pub struct PublishingMatchStore {
    inner: Arc<dyn MatchStore>,
    log: Arc<ChangeLog>,
    write_lock: Mutex<()>,
}

impl PublishingMatchStore {
    #[must_use]
    pub fn new(inner: Arc<dyn MatchStore>, log: Arc<ChangeLog>) -> Self {
        Self {
            inner,
            log,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl MatchStore for PublishingMatchStore {
    async fn put(&self, record: &MatchRecord) -> Result<ChangeKind> {
        let image = record.to_image()?;
        let _guard = self.write_lock.lock().await;
        let kind = self.inner.put(record).await?;
        self.log.publish(kind, record.key(), Some(image));
        Ok(kind)
    }

    async fn delete(&self, key: &MatchKey) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let existed = self.inner.delete(key).await?;
        if existed {
            self.log.publish(ChangeKind::Remove, key.clone(), None);
        }
        Ok(existed)
    }

    async fn get(&self, key: &MatchKey) -> Result<Option<MatchRecord>> {
        self.inner.get(key).await
    }

    async fn list_match(&self, match_id: &MatchId) -> Result<Vec<MatchRecord>> {
        self.inner.list_match(match_id).await
    }

    async fn list(&self) -> Result<Vec<MatchRecord>> {
        self.inner.list().await
    }
}
