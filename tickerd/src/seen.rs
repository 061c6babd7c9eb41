//! Seen-card ledger.
//!
//! Append-only history of content identifiers already shown to a user, read
//! back as the exclusion list for the next generation request. Everything
//! here is best-effort: a lost write only risks a near-duplicate card later,
//! so failures are logged and never fail the serving request.

use crate::cards::Card;
use crate::db::models::SeenCardRow;
use crate::db::store::SeenCardLog;
use crate::types::Category;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Cap on how much history feeds the exclusion list. Older cards may
/// legitimately resurface.
pub const SEEN_HISTORY_LIMIT: u32 = 50;

pub struct SeenCards {
    store: Arc<dyn SeenCardLog>,
}

impl SeenCards {
    pub fn new(store: Arc<dyn SeenCardLog>) -> Self {
        Self { store }
    }

    /// The most recent identifiers for the exclusion list, newest first.
    /// Degrades to an empty list on storage failure.
    pub async fn recent_identifiers(&self, user_id: &str, category: Category) -> Vec<String> {
        match self
            .store
            .recent(user_id, category, SEEN_HISTORY_LIMIT)
            .await
        {
            Ok(identifiers) => {
                tracing::debug!(
                    user_id,
                    category = %category,
                    count = identifiers.len(),
                    "loaded seen-card history"
                );
                identifiers
            }
            Err(err) => {
                tracing::warn!(user_id, %err, "failed to load seen cards, proceeding without exclusions");
                Vec::new()
            }
        }
    }

    /// Record a freshly served batch. Failures are swallowed.
    pub async fn record_shown(&self, user_id: &str, cards: &[Card], now: DateTime<Utc>) {
        let rows: Vec<SeenCardRow> = cards
            .iter()
            .filter(|card| !card.identifier().is_empty())
            .map(|card| SeenCardRow {
                user_id: user_id.to_string(),
                category: card.category(),
                content_identifier: card.identifier().to_string(),
                shown_at: now,
            })
            .collect();

        if rows.is_empty() {
            return;
        }

        if let Err(err) = self.store.append(&rows).await {
            tracing::warn!(user_id, %err, "failed to record seen cards");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardBase, IdeaCard};
    use crate::db::errors::StoreError;
    use crate::db::memory::MemoryStore;
    use async_trait::async_trait;

    fn idea(title: &str) -> Card {
        Card::Idea(IdeaCard {
            base: CardBase {
                title: title.to_string(),
                tagline: "t".to_string(),
                simple_explainer: "e".to_string(),
                what_to_expect: None,
                good_reasons: vec!["r".to_string()],
                concerns: vec!["c".to_string()],
                timeline: String::new(),
                risk_level: String::new(),
                beginner_tip: String::new(),
                sources: vec![],
                get_started: vec![],
            },
            category: String::new(),
            investment_range: String::new(),
        })
    }

    #[tokio::test]
    async fn record_then_recent_round_trips() {
        let store = Arc::new(MemoryStore::new());
        let seen = SeenCards::new(store.clone());
        let now = Utc::now();

        seen.record_shown("u1", &[idea("A"), idea("B")], now).await;
        let recent = seen.recent_identifiers("u1", Category::Idea).await;
        assert_eq!(recent.len(), 2);
        assert!(recent.contains(&"A".to_string()));
    }

    struct BrokenLog;

    #[async_trait]
    impl SeenCardLog for BrokenLog {
        async fn append(&self, _rows: &[SeenCardRow]) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }
        async fn recent(
            &self,
            _user_id: &str,
            _category: Category,
            _limit: u32,
        ) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }
    }

    #[tokio::test]
    async fn storage_failures_degrade_silently() {
        let seen = SeenCards::new(Arc::new(BrokenLog));
        seen.record_shown("u1", &[idea("A")], Utc::now()).await;
        assert!(seen.recent_identifiers("u1", Category::Idea).await.is_empty());
    }
}
