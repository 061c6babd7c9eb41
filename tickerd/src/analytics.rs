//! Fire-and-forget analytics seam.
//!
//! The core emits events synchronously through this trait; implementations
//! must absorb their own failures. Nothing in the request path ever depends
//! on an event being recorded.

use crate::types::{Category, SwipeDirection, Tier};

/// One observable event in the card/swipe lifecycle.
#[derive(Debug, Clone)]
pub enum AnalyticsEvent {
    CardsServed {
        user_id: String,
        category: Category,
        count: usize,
        cached: bool,
    },
    SwipeTracked {
        user_id: String,
        direction: SwipeDirection,
        swipes_remaining: u32,
        tier: Tier,
    },
    SwipeUndone {
        user_id: String,
        direction: SwipeDirection,
    },
    SavedCardWriteFailed {
        user_id: String,
        content_id: String,
    },
}

pub trait AnalyticsSink: Send + Sync {
    /// Record an event. Must not fail and must not block meaningfully.
    fn record(&self, event: AnalyticsEvent);
}

/// Default sink: structured log lines, picked up by whatever ships logs.
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn record(&self, event: AnalyticsEvent) {
        match event {
            AnalyticsEvent::CardsServed {
                user_id,
                category,
                count,
                cached,
            } => {
                tracing::info!(%user_id, %category, count, cached, "cards served");
            }
            AnalyticsEvent::SwipeTracked {
                user_id,
                direction,
                swipes_remaining,
                tier,
            } => {
                tracing::info!(%user_id, %direction, swipes_remaining, %tier, "swipe tracked");
            }
            AnalyticsEvent::SwipeUndone { user_id, direction } => {
                tracing::info!(%user_id, %direction, "swipe undone");
            }
            AnalyticsEvent::SavedCardWriteFailed {
                user_id,
                content_id,
            } => {
                tracing::warn!(%user_id, %content_id, "saved-card write failed");
            }
        }
    }
}
