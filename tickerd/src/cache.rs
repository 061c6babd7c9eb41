//! Time-boxed cache of generated card batches.
//!
//! One batch per (user, category). Freshness is evaluated at read time
//! against the stored generation timestamp; nothing sweeps stale rows, the
//! next `put` simply overwrites them.

use crate::cards::Card;
use crate::db::errors::StoreError;
use crate::db::models::CachedBatchRow;
use crate::db::store::BatchCache;
use crate::types::{Category, UserProfile};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// How long a generated batch stays servable.
pub const CACHE_TTL_HOURS: i64 = 24;

pub struct ContentCache {
    store: Arc<dyn BatchCache>,
}

impl ContentCache {
    pub fn new(store: Arc<dyn BatchCache>) -> Self {
        Self { store }
    }

    /// The cached batch, if one exists and is still fresh as of `now`.
    pub async fn get(
        &self,
        user_id: &str,
        category: Category,
        now: DateTime<Utc>,
    ) -> Result<Option<CachedBatchRow>, StoreError> {
        let Some(batch) = self.store.get(user_id, category).await? else {
            return Ok(None);
        };

        let age = now.signed_duration_since(batch.generated_at);
        if age < Duration::hours(CACHE_TTL_HOURS) {
            tracing::debug!(
                user_id,
                category = %category,
                age_minutes = age.num_minutes(),
                "serving cached batch"
            );
            Ok(Some(batch))
        } else {
            tracing::debug!(
                user_id,
                category = %category,
                age_hours = age.num_hours(),
                "cached batch expired"
            );
            Ok(None)
        }
    }

    /// Wholesale overwrite of the batch for (user, category).
    pub async fn put(
        &self,
        user_id: &str,
        category: Category,
        items: Vec<Card>,
        profile: UserProfile,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.store
            .put(&CachedBatchRow {
                user_id: user_id.to_string(),
                category,
                profile,
                generated_at: now,
                items,
            })
            .await
    }
}
