//! In-memory storage backend.
//!
//! Backs the test suite and `database.url`-less development deployments.
//! State lives in process memory and is lost on restart. Per-user quota
//! serialization uses one async mutex per user record, which gives the same
//! ordering guarantees the Postgres backend gets from row locks.

use crate::db::errors::StoreError;
use crate::db::models::{
    CachedBatchRow, SavedCardRow, SeenCardRow, SwipeEventRow, UserQuotaRecord,
};
use crate::db::store::{
    BatchCache, QuotaStore, QuotaTransition, SavedCardStore, SeenCardLog, TransactOutcome,
};
use crate::types::Category;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

type QuotaCell = Arc<Mutex<Option<UserQuotaRecord>>>;

#[derive(Default)]
pub struct MemoryStore {
    quotas: DashMap<String, QuotaCell>,
    swipe_events: StdMutex<Vec<SwipeEventRow>>,
    seen: StdMutex<Vec<SeenCardRow>>,
    cache: DashMap<(String, Category), CachedBatchRow>,
    saved: DashMap<(String, String), SavedCardRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn quota_cell(&self, user_id: &str) -> QuotaCell {
        self.quotas
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .value()
            .clone()
    }

    /// Snapshot of the audit trail, oldest first. Test introspection only.
    pub fn swipe_events(&self) -> Vec<SwipeEventRow> {
        self.swipe_events.lock().expect("swipe event log poisoned").clone()
    }

    /// Snapshot of the seen-card log, oldest first. Test introspection only.
    pub fn seen_rows(&self) -> Vec<SeenCardRow> {
        self.seen.lock().expect("seen log poisoned").clone()
    }

    /// Raw cache row regardless of age, bypassing freshness checks. Lets
    /// tests assert that expiry leaves the row physically in place.
    pub fn raw_cache_row(&self, user_id: &str, category: Category) -> Option<CachedBatchRow> {
        self.cache
            .get(&(user_id.to_string(), category))
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl QuotaStore for MemoryStore {
    async fn fetch(&self, user_id: &str) -> Result<Option<UserQuotaRecord>, StoreError> {
        let cell = match self.quotas.get(user_id) {
            Some(entry) => entry.value().clone(),
            None => return Ok(None),
        };
        let guard = cell.lock().await;
        Ok(guard.clone())
    }

    async fn transact(&self, user_id: &str, apply: QuotaTransition<'_>) -> TransactOutcome {
        let cell = self.quota_cell(user_id);
        let mut guard = cell.lock().await;

        match apply(guard.clone()) {
            Ok(update) => {
                *guard = Some(update.record.clone());
                if let Some(event) = &update.swipe {
                    self.swipe_events
                        .lock()
                        .expect("swipe event log poisoned")
                        .push(event.clone());
                }
                Ok(Ok(update))
            }
            Err(abort) => Ok(Err(abort)),
        }
    }
}

#[async_trait]
impl SeenCardLog for MemoryStore {
    async fn append(&self, rows: &[SeenCardRow]) -> Result<(), StoreError> {
        self.seen
            .lock()
            .expect("seen log poisoned")
            .extend_from_slice(rows);
        Ok(())
    }

    async fn recent(
        &self,
        user_id: &str,
        category: Category,
        limit: u32,
    ) -> Result<Vec<String>, StoreError> {
        let log = self.seen.lock().expect("seen log poisoned");
        let mut matching: Vec<(usize, &SeenCardRow)> = log
            .iter()
            .enumerate()
            .filter(|(_, row)| row.user_id == user_id && row.category == category)
            .collect();
        // Newest first; insertion order breaks timestamp ties.
        matching.sort_by(|(ia, a), (ib, b)| b.shown_at.cmp(&a.shown_at).then(ib.cmp(ia)));
        Ok(matching
            .into_iter()
            .take(limit as usize)
            .map(|(_, row)| row.content_identifier.clone())
            .collect())
    }
}

#[async_trait]
impl BatchCache for MemoryStore {
    async fn get(
        &self,
        user_id: &str,
        category: Category,
    ) -> Result<Option<CachedBatchRow>, StoreError> {
        Ok(self.raw_cache_row(user_id, category))
    }

    async fn put(&self, batch: &CachedBatchRow) -> Result<(), StoreError> {
        self.cache
            .insert((batch.user_id.clone(), batch.category), batch.clone());
        Ok(())
    }
}

#[async_trait]
impl SavedCardStore for MemoryStore {
    async fn insert(&self, row: &SavedCardRow) -> Result<(), StoreError> {
        self.saved
            .entry((row.user_id.clone(), row.content_id.clone()))
            .or_insert_with(|| row.clone());
        Ok(())
    }

    async fn remove(&self, user_id: &str, content_id: &str) -> Result<(), StoreError> {
        self.saved
            .remove(&(user_id.to_string(), content_id.to_string()));
        Ok(())
    }

    async fn contains(&self, user_id: &str, content_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .saved
            .contains_key(&(user_id.to_string(), content_id.to_string())))
    }
}
