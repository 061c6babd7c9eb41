//! PostgreSQL storage backend (sqlx).
//!
//! Quota transactions take a row lock (`SELECT … FOR UPDATE`) so concurrent
//! mutations of the same user record serialize at the database; operations on
//! different users never contend. The audit row is inserted inside the same
//! transaction as the counter update, so a swipe either fully commits or
//! leaves no trace.

use crate::db::errors::StoreError;
use crate::db::models::{
    CachedBatchRow, SavedCardRow, SeenCardRow, UserQuotaRecord,
};
use crate::db::store::{
    BatchCache, QuotaStore, QuotaTransition, SavedCardStore, SeenCardLog, TransactOutcome,
};
use crate::types::{Category, Tier, UserProfile};
use crate::cards::Card;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct QuotaRow {
    user_id: String,
    tier: String,
    swipes_remaining: i32,
    last_reset_date_key: Option<String>,
}

impl QuotaRow {
    fn into_record(self) -> Result<UserQuotaRecord, StoreError> {
        let tier: Tier = self.tier.parse().map_err(|e: String| anyhow!(e))?;
        let swipes_remaining = u32::try_from(self.swipes_remaining)
            .map_err(|_| anyhow!("negative swipes_remaining for user {}", self.user_id))?;
        Ok(UserQuotaRecord {
            user_id: self.user_id,
            tier,
            swipes_remaining,
            last_reset_date_key: self.last_reset_date_key,
        })
    }
}

#[derive(FromRow)]
struct CacheRow {
    user_id: String,
    category: String,
    profile: Json<UserProfile>,
    generated_at: DateTime<Utc>,
    items: Json<Vec<Card>>,
}

impl CacheRow {
    fn into_batch(self) -> Result<CachedBatchRow, StoreError> {
        let category: Category = self.category.parse().map_err(|e: String| anyhow!(e))?;
        Ok(CachedBatchRow {
            user_id: self.user_id,
            category,
            profile: self.profile.0,
            generated_at: self.generated_at,
            items: self.items.0,
        })
    }
}

#[async_trait]
impl QuotaStore for PgStore {
    async fn fetch(&self, user_id: &str) -> Result<Option<UserQuotaRecord>, StoreError> {
        let row = sqlx::query_as::<_, QuotaRow>(
            "SELECT user_id, tier, swipes_remaining, last_reset_date_key \
             FROM user_quotas WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(QuotaRow::into_record).transpose()
    }

    async fn transact(&self, user_id: &str, apply: QuotaTransition<'_>) -> TransactOutcome {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, QuotaRow>(
            "SELECT user_id, tier, swipes_remaining, last_reset_date_key \
             FROM user_quotas WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .map(QuotaRow::into_record)
        .transpose()?;

        let update = match apply(current) {
            Ok(update) => update,
            Err(abort) => {
                tx.rollback().await?;
                return Ok(Err(abort));
            }
        };

        sqlx::query(
            "INSERT INTO user_quotas (user_id, tier, swipes_remaining, last_reset_date_key) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE \
             SET tier = EXCLUDED.tier, \
                 swipes_remaining = EXCLUDED.swipes_remaining, \
                 last_reset_date_key = EXCLUDED.last_reset_date_key, \
                 updated_at = now()",
        )
        .bind(&update.record.user_id)
        .bind(update.record.tier.as_str())
        .bind(update.record.swipes_remaining as i32)
        .bind(&update.record.last_reset_date_key)
        .execute(&mut *tx)
        .await?;

        if let Some(event) = &update.swipe {
            sqlx::query(
                "INSERT INTO swipe_history (id, user_id, content_id, direction, swiped_at) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(Uuid::new_v4())
            .bind(&event.user_id)
            .bind(&event.content_id)
            .bind(event.direction.as_str())
            .bind(event.swiped_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Ok(update))
    }
}

#[async_trait]
impl SeenCardLog for PgStore {
    async fn append(&self, rows: &[SeenCardRow]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for row in rows {
            sqlx::query(
                "INSERT INTO seen_cards (user_id, category, content_identifier, shown_at) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(&row.user_id)
            .bind(row.category.as_str())
            .bind(&row.content_identifier)
            .bind(row.shown_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn recent(
        &self,
        user_id: &str,
        category: Category,
        limit: u32,
    ) -> Result<Vec<String>, StoreError> {
        let identifiers = sqlx::query_scalar::<_, String>(
            "SELECT content_identifier FROM seen_cards \
             WHERE user_id = $1 AND category = $2 \
             ORDER BY shown_at DESC, id DESC \
             LIMIT $3",
        )
        .bind(user_id)
        .bind(category.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(identifiers)
    }
}

#[async_trait]
impl BatchCache for PgStore {
    async fn get(
        &self,
        user_id: &str,
        category: Category,
    ) -> Result<Option<CachedBatchRow>, StoreError> {
        let row = sqlx::query_as::<_, CacheRow>(
            "SELECT user_id, category, profile, generated_at, items \
             FROM card_cache WHERE user_id = $1 AND category = $2",
        )
        .bind(user_id)
        .bind(category.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CacheRow::into_batch).transpose()
    }

    async fn put(&self, batch: &CachedBatchRow) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO card_cache (user_id, category, profile, generated_at, items) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, category) DO UPDATE \
             SET profile = EXCLUDED.profile, \
                 generated_at = EXCLUDED.generated_at, \
                 items = EXCLUDED.items",
        )
        .bind(&batch.user_id)
        .bind(batch.category.as_str())
        .bind(Json(&batch.profile))
        .bind(batch.generated_at)
        .bind(Json(&batch.items))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SavedCardStore for PgStore {
    async fn insert(&self, row: &SavedCardRow) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO saved_cards (user_id, content_id, saved_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, content_id) DO NOTHING",
        )
        .bind(&row.user_id)
        .bind(&row.content_id)
        .bind(row.saved_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, user_id: &str, content_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM saved_cards WHERE user_id = $1 AND content_id = $2")
            .bind(user_id)
            .bind(content_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn contains(&self, user_id: &str, content_id: &str) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM saved_cards WHERE user_id = $1 AND content_id = $2)",
        )
        .bind(user_id)
        .bind(content_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
