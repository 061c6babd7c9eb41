//! Daily swipe-quota ledger.
//!
//! Every mutation is a pure state transition executed through the store's
//! per-user transaction primitive, so concurrent operations on one user's
//! record serialize and an aborted operation persists nothing. The consume
//! path is the only place the daily reset happens: read-only status checks
//! report what a reset *would* do without ever writing it, which keeps two
//! concurrent readers from racing each other (or a concurrent decrement)
//! to reset the counter.

use crate::dates::{date_key, needs_reset};
use crate::db::models::{SwipeEventRow, UserQuotaRecord};
use crate::db::store::{QuotaStore, QuotaUpdate, TransitionAbort};
use crate::errors::{Error, Result};
use crate::types::{SwipeDirection, Tier, UserId};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Post-operation quota view returned to clients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaStatus {
    pub swipes_remaining: u32,
    pub max_swipes: u32,
    pub tier: Tier,
}

impl QuotaStatus {
    fn of(record: &UserQuotaRecord) -> Self {
        Self {
            swipes_remaining: record.swipes_remaining,
            max_swipes: record.tier.daily_limit(),
            tier: record.tier,
        }
    }
}

/// Read-only status including whether the next consume would reset first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaStatusReport {
    pub status: QuotaStatus,
    pub needs_reset: bool,
}

pub struct QuotaLedger {
    store: Arc<dyn QuotaStore>,
}

impl QuotaLedger {
    pub fn new(store: Arc<dyn QuotaStore>) -> Self {
        Self { store }
    }

    /// Atomically reset-if-due, check, decrement, and append the audit row.
    ///
    /// Fails with [`Error::ResourceExhausted`] when the counter is spent
    /// after any applicable reset; the abort persists nothing.
    pub async fn check_and_consume(
        &self,
        user_id: &str,
        content_id: &str,
        direction: SwipeDirection,
        now: DateTime<Utc>,
    ) -> Result<QuotaStatus> {
        let content_id = content_id.to_string();
        let outcome = self
            .store
            .transact(user_id, &move |current| {
                consume_transition(current, &content_id, direction, now)
            })
            .await?;

        match outcome {
            Ok(update) => {
                tracing::debug!(
                    user_id,
                    remaining = update.record.swipes_remaining,
                    "swipe consumed"
                );
                Ok(QuotaStatus::of(&update.record))
            }
            Err(abort) => Err(abort_to_error(abort, user_id)),
        }
    }

    /// Give one swipe back, capped at the tier limit. Never touches the
    /// reset marker and never fails due to quota.
    pub async fn refund(&self, user_id: &str, _now: DateTime<Utc>) -> Result<QuotaStatus> {
        let outcome = self
            .store
            .transact(user_id, &refund_transition)
            .await?;

        match outcome {
            Ok(update) => Ok(QuotaStatus::of(&update.record)),
            Err(abort) => Err(abort_to_error(abort, user_id)),
        }
    }

    /// Read-only status. Reports the counter as it would look after a reset
    /// without persisting anything.
    pub async fn peek_status(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<QuotaStatusReport> {
        let record = self
            .store
            .fetch(user_id)
            .await?
            .ok_or_else(|| Error::NotFound {
                resource: "user",
                id: user_id.to_string(),
            })?;

        let today = date_key(now);
        let would_reset = needs_reset(record.last_reset_date_key.as_deref(), &today);
        let swipes_remaining = if would_reset {
            record.tier.daily_limit()
        } else {
            record.swipes_remaining
        };

        Ok(QuotaStatusReport {
            status: QuotaStatus {
                swipes_remaining,
                max_swipes: record.tier.daily_limit(),
                tier: record.tier,
            },
            needs_reset: would_reset,
        })
    }

    /// Apply a subscription change from the billing collaborator. Any tier
    /// change grants a full refreshed allotment rather than pro-rating.
    pub async fn set_tier(&self, user_id: &str, tier: Tier) -> Result<QuotaStatus> {
        let outcome = self
            .store
            .transact(user_id, &move |current| set_tier_transition(current, tier))
            .await?;

        match outcome {
            Ok(update) => {
                tracing::info!(user_id, tier = %tier, "subscription tier updated");
                Ok(QuotaStatus::of(&update.record))
            }
            Err(abort) => Err(abort_to_error(abort, user_id)),
        }
    }

    /// Get-or-create, invoked by the identity-provisioning collaborator.
    /// Existing records come back untouched.
    pub async fn provision(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<QuotaStatus> {
        let user = user_id.clone();
        let today = date_key(now);
        let outcome = self
            .store
            .transact(user_id, &move |current| {
                Ok(QuotaUpdate {
                    record: current
                        .unwrap_or_else(|| UserQuotaRecord::provision_default(&user, &today)),
                    swipe: None,
                })
            })
            .await?;

        match outcome {
            Ok(update) => Ok(QuotaStatus::of(&update.record)),
            Err(abort) => Err(abort_to_error(abort, user_id)),
        }
    }
}

fn abort_to_error(abort: TransitionAbort, user_id: &str) -> Error {
    match abort {
        TransitionAbort::MissingRecord => Error::NotFound {
            resource: "user",
            id: user_id.to_string(),
        },
        TransitionAbort::QuotaExhausted { tier, max_swipes } => {
            Error::ResourceExhausted { tier, max_swipes }
        }
    }
}

fn consume_transition(
    current: Option<UserQuotaRecord>,
    content_id: &str,
    direction: SwipeDirection,
    now: DateTime<Utc>,
) -> std::result::Result<QuotaUpdate, TransitionAbort> {
    let mut record = current.ok_or(TransitionAbort::MissingRecord)?;
    let today = date_key(now);

    if needs_reset(record.last_reset_date_key.as_deref(), &today) {
        record.swipes_remaining = record.tier.daily_limit();
        record.last_reset_date_key = Some(today);
    }

    if record.swipes_remaining == 0 {
        return Err(TransitionAbort::QuotaExhausted {
            tier: record.tier,
            max_swipes: record.tier.daily_limit(),
        });
    }

    record.swipes_remaining -= 1;
    let swipe = SwipeEventRow {
        user_id: record.user_id.clone(),
        content_id: content_id.to_string(),
        direction,
        swiped_at: now,
    };

    Ok(QuotaUpdate {
        record,
        swipe: Some(swipe),
    })
}

fn refund_transition(
    current: Option<UserQuotaRecord>,
) -> std::result::Result<QuotaUpdate, TransitionAbort> {
    let mut record = current.ok_or(TransitionAbort::MissingRecord)?;
    record.swipes_remaining = (record.swipes_remaining + 1).min(record.tier.daily_limit());
    Ok(QuotaUpdate {
        record,
        swipe: None,
    })
}

fn set_tier_transition(
    current: Option<UserQuotaRecord>,
    tier: Tier,
) -> std::result::Result<QuotaUpdate, TransitionAbort> {
    let mut record = current.ok_or(TransitionAbort::MissingRecord)?;
    record.tier = tier;
    record.swipes_remaining = tier.daily_limit();
    Ok(QuotaUpdate {
        record,
        swipe: None,
    })
}
