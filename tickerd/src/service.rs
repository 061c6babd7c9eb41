//! Card service: the orchestrator behind every public operation.
//!
//! Composes the quota ledger, the batch cache, the seen-card ledger, the
//! saved-card store, and the content generator. The quota ledger is the
//! source of truth for "did this swipe count"; cache, seen-card, and
//! saved-card writes are convenience state and never fail a request. A cache
//! write only happens after a batch has been fully generated and screened, so
//! an abandoned request can never leave a partial batch behind.

use crate::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::cache::ContentCache;
use crate::cards::rotation::rotation_theme;
use crate::cards::validation::screen_batch;
use crate::cards::Card;
use crate::db::models::SavedCardRow;
use crate::db::store::SavedCardStore;
use crate::errors::{Error, Result};
use crate::generation::prices::StockPriceService;
use crate::generation::ContentGenerator;
use crate::quota::{QuotaLedger, QuotaStatus, QuotaStatusReport};
use crate::seen::SeenCards;
use crate::types::{Category, SwipeDirection, UserProfile};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Upper bound on one generation request.
pub const MAX_BATCH_SIZE: u32 = 20;

/// A served batch plus whether it came from cache.
#[derive(Debug, Clone)]
pub struct GeneratedCards {
    pub cards: Vec<Card>,
    pub cached: bool,
}

pub struct CardService {
    ledger: Arc<QuotaLedger>,
    cache: ContentCache,
    seen: SeenCards,
    saved: Arc<dyn SavedCardStore>,
    generator: Arc<dyn ContentGenerator>,
    prices: Arc<StockPriceService>,
    analytics: Arc<dyn AnalyticsSink>,
}

impl CardService {
    pub fn new(
        ledger: Arc<QuotaLedger>,
        cache: ContentCache,
        seen: SeenCards,
        saved: Arc<dyn SavedCardStore>,
        generator: Arc<dyn ContentGenerator>,
        prices: Arc<StockPriceService>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            ledger,
            cache,
            seen,
            saved,
            generator,
            prices,
            analytics,
        }
    }

    /// Serve a batch of cards: cached if fresh, freshly generated otherwise.
    /// Reading from cache costs no quota and no generation call.
    pub async fn get_cards(
        &self,
        user_id: &str,
        profile: &UserProfile,
        category: Category,
        count: u32,
        now: DateTime<Utc>,
    ) -> Result<GeneratedCards> {
        if count == 0 || count > MAX_BATCH_SIZE {
            return Err(Error::InvalidArgument {
                message: format!("count must be between 1 and {MAX_BATCH_SIZE}, got {count}"),
            });
        }

        // The user must exist, but generation itself is quota-independent.
        self.ledger.peek_status(user_id, now).await?;

        if let Some(batch) = self.cache.get(user_id, category, now).await? {
            self.analytics.record(AnalyticsEvent::CardsServed {
                user_id: user_id.to_string(),
                category,
                count: batch.items.len(),
                cached: true,
            });
            return Ok(GeneratedCards {
                cards: batch.items,
                cached: true,
            });
        }

        let exclude = self.seen.recent_identifiers(user_id, category).await;
        let theme = rotation_theme(user_id, now);
        tracing::info!(user_id, %category, count, theme, "generating fresh card batch");

        let mut raw = self
            .generator
            .generate(profile, category, count, &exclude, theme)
            .await
            .map_err(|err| Error::GenerationFailed {
                message: err.to_string(),
            })?;

        if category == Category::Stock {
            self.prices.enrich(&mut raw).await;
        }

        let cards = screen_batch(raw, category);
        if cards.is_empty() {
            return Err(Error::GenerationFailed {
                message: "no valid cards survived screening".to_string(),
            });
        }

        // Cache and seen-card writes are best-effort: losing them costs a
        // regeneration or a near-duplicate later, not correctness.
        if let Err(err) = self
            .cache
            .put(user_id, category, cards.clone(), profile.clone(), now)
            .await
        {
            tracing::warn!(user_id, %err, "failed to cache generated batch");
        }
        self.seen.record_shown(user_id, &cards, now).await;

        self.analytics.record(AnalyticsEvent::CardsServed {
            user_id: user_id.to_string(),
            category,
            count: cards.len(),
            cached: false,
        });

        Ok(GeneratedCards {
            cards,
            cached: false,
        })
    }

    /// Record a swipe against the daily quota. On a right swipe the card is
    /// additionally saved — after the quota transaction commits, and without
    /// affecting it: if the save fails, the swipe still counted.
    pub async fn track_swipe(
        &self,
        user_id: &str,
        content_id: &str,
        direction: SwipeDirection,
        now: DateTime<Utc>,
    ) -> Result<QuotaStatus> {
        let status = self
            .ledger
            .check_and_consume(user_id, content_id, direction, now)
            .await?;

        if direction == SwipeDirection::Right {
            let row = SavedCardRow {
                user_id: user_id.to_string(),
                content_id: content_id.to_string(),
                saved_at: now,
            };
            if let Err(err) = self.saved.insert(&row).await {
                tracing::warn!(user_id, content_id, %err, "saved-card write failed after swipe committed");
                self.analytics.record(AnalyticsEvent::SavedCardWriteFailed {
                    user_id: user_id.to_string(),
                    content_id: content_id.to_string(),
                });
            }
        }

        self.analytics.record(AnalyticsEvent::SwipeTracked {
            user_id: user_id.to_string(),
            direction,
            swipes_remaining: status.swipes_remaining,
            tier: status.tier,
        });

        Ok(status)
    }

    /// Undo the most recent swipe: refund the quota unit and, for a right
    /// swipe, retract the saved card (removing an absent one is a no-op).
    pub async fn undo_swipe(
        &self,
        user_id: &str,
        content_id: &str,
        direction: SwipeDirection,
        now: DateTime<Utc>,
    ) -> Result<QuotaStatus> {
        let status = self.ledger.refund(user_id, now).await?;

        if direction == SwipeDirection::Right
            && let Err(err) = self.saved.remove(user_id, content_id).await
        {
            tracing::warn!(user_id, content_id, %err, "saved-card removal failed during undo");
        }

        self.analytics.record(AnalyticsEvent::SwipeUndone {
            user_id: user_id.to_string(),
            direction,
        });

        Ok(status)
    }

    /// Read-only quota status; never mutates stored state.
    pub async fn status(&self, user_id: &str, now: DateTime<Utc>) -> Result<QuotaStatusReport> {
        self.ledger.peek_status(user_id, now).await
    }
}
