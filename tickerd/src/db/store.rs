//! Storage trait seams.
//!
//! Each backing collection is exposed through a narrow trait so the service
//! layer can be wired against Postgres in production and the in-memory store
//! in tests (and in url-less dev deployments). The quota store is the only
//! seam with transactional requirements: its [`QuotaStore::transact`] runs a
//! pure state-transition function under the store's per-user serialization
//! primitive, so concurrent mutations of one user's record never interleave.

use crate::db::errors::StoreError;
use crate::db::models::{
    CachedBatchRow, SavedCardRow, SeenCardRow, SwipeEventRow, UserQuotaRecord,
};
use crate::types::{Category, Tier};
use async_trait::async_trait;

/// Domain-level abort raised by a quota transition. Aborting rolls the
/// transaction back; nothing is persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionAbort {
    /// The user record does not exist and the transition does not create one.
    MissingRecord,
    /// The quota is spent for the day (after any applicable reset).
    QuotaExhausted { tier: Tier, max_swipes: u32 },
}

/// The writes a successful quota transition wants applied atomically: the new
/// record state, plus optionally one audit row appended in the same
/// transaction.
#[derive(Debug, Clone)]
pub struct QuotaUpdate {
    pub record: UserQuotaRecord,
    pub swipe: Option<SwipeEventRow>,
}

/// Pure state-transition function executed under the per-user transaction.
/// Receives the current record (`None` if the user has never been
/// provisioned) and either produces the writes to apply or aborts.
pub type QuotaTransition<'a> =
    &'a (dyn Fn(Option<UserQuotaRecord>) -> Result<QuotaUpdate, TransitionAbort> + Send + Sync);

/// Outcome of [`QuotaStore::transact`]: the outer error is a storage failure
/// (nothing committed, safe to retry), the inner one a domain abort.
pub type TransactOutcome = Result<Result<QuotaUpdate, TransitionAbort>, StoreError>;

#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Read one user's record without locking. Used by read-only status paths.
    async fn fetch(&self, user_id: &str) -> Result<Option<UserQuotaRecord>, StoreError>;

    /// Run `apply` against the current record under per-user serialization
    /// and persist its writes. Two concurrent calls for the same user are
    /// ordered; calls for different users never contend.
    async fn transact(&self, user_id: &str, apply: QuotaTransition<'_>) -> TransactOutcome;
}

#[async_trait]
pub trait SeenCardLog: Send + Sync {
    /// Append shown-card rows. Append-only; no uniqueness is enforced.
    async fn append(&self, rows: &[SeenCardRow]) -> Result<(), StoreError>;

    /// The `limit` most recently shown identifiers, newest first.
    async fn recent(
        &self,
        user_id: &str,
        category: Category,
        limit: u32,
    ) -> Result<Vec<String>, StoreError>;
}

#[async_trait]
pub trait BatchCache: Send + Sync {
    /// Fetch the stored batch regardless of age. Freshness is the caller's
    /// concern; stale rows stay in place until the next `put`.
    async fn get(
        &self,
        user_id: &str,
        category: Category,
    ) -> Result<Option<CachedBatchRow>, StoreError>;

    /// Wholesale upsert of the batch for (user, category).
    async fn put(&self, batch: &CachedBatchRow) -> Result<(), StoreError>;
}

#[async_trait]
pub trait SavedCardStore: Send + Sync {
    /// Record a saved card. Re-inserting an existing association is a no-op.
    async fn insert(&self, row: &SavedCardRow) -> Result<(), StoreError>;

    /// Remove a saved card. Removing an absent association is not an error.
    async fn remove(&self, user_id: &str, content_id: &str) -> Result<(), StoreError>;

    /// Whether the association currently exists.
    async fn contains(&self, user_id: &str, content_id: &str) -> Result<bool, StoreError>;
}
