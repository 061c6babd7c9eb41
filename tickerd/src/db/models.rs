//! Storage-layer record structures.
//!
//! These are the persisted shapes; API DTOs live in `api::models` and are
//! converted at the handler boundary.

use crate::cards::Card;
use crate::types::{Category, SwipeDirection, Tier, UserId, UserProfile};
use chrono::{DateTime, Utc};

/// Per-user quota document. One row per user, mutated only through
/// [`crate::db::store::QuotaStore::transact`].
#[derive(Debug, Clone, PartialEq)]
pub struct UserQuotaRecord {
    pub user_id: UserId,
    pub tier: Tier,
    pub swipes_remaining: u32,
    /// `None` means the record has never been through a daily reset.
    pub last_reset_date_key: Option<String>,
}

impl UserQuotaRecord {
    /// Default record minted when the identity layer provisions a new user.
    pub fn provision_default(user_id: &str, today: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            tier: Tier::Free,
            swipes_remaining: Tier::Free.daily_limit(),
            last_reset_date_key: Some(today.to_string()),
        }
    }
}

/// Append-only audit row written inside the consume transaction. Never read
/// back by this service; external analytics consume the table directly.
#[derive(Debug, Clone)]
pub struct SwipeEventRow {
    pub user_id: UserId,
    pub content_id: String,
    pub direction: SwipeDirection,
    pub swiped_at: DateTime<Utc>,
}

/// One previously-shown content identifier. Append-only; duplicates across
/// time are expected once a card ages out of the recency window.
#[derive(Debug, Clone)]
pub struct SeenCardRow {
    pub user_id: UserId,
    pub category: Category,
    pub content_identifier: String,
    pub shown_at: DateTime<Utc>,
}

/// The last generated batch for one (user, category) pair. Overwritten
/// wholesale on regeneration; freshness is judged at read time against
/// `generated_at`, never by background expiry.
#[derive(Debug, Clone)]
pub struct CachedBatchRow {
    pub user_id: UserId,
    pub category: Category,
    pub profile: UserProfile,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<Card>,
}

/// A right-swiped card the user wants to keep. Best-effort bookkeeping
/// relative to the quota ledger.
#[derive(Debug, Clone)]
pub struct SavedCardRow {
    pub user_id: UserId,
    pub content_id: String,
    pub saved_at: DateTime<Utc>,
}
