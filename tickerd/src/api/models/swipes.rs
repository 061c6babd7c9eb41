//! DTOs for swipe tracking, undo, status, and tier changes.

use crate::quota::{QuotaStatus, QuotaStatusReport};
use crate::types::{SwipeDirection, Tier, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackSwipeRequest {
    /// Accepts the legacy `investmentId` key the first mobile releases send.
    #[serde(alias = "investmentId")]
    pub content_id: String,
    pub direction: SwipeDirection,
}

/// Quota state after a swipe or undo.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwipeResponse {
    pub swipes_remaining: u32,
    pub max_swipes: u32,
    pub tier: Tier,
}

impl From<QuotaStatus> for SwipeResponse {
    fn from(status: QuotaStatus) -> Self {
        Self {
            swipes_remaining: status.swipes_remaining,
            max_swipes: status.max_swipes,
            tier: status.tier,
        }
    }
}

/// Read-only quota status, including whether the next swipe will trigger the
/// daily reset.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwipeStatusResponse {
    pub swipes_remaining: u32,
    pub max_swipes: u32,
    pub tier: Tier,
    pub needs_reset: bool,
}

impl From<QuotaStatusReport> for SwipeStatusResponse {
    fn from(report: QuotaStatusReport) -> Self {
        Self {
            swipes_remaining: report.status.swipes_remaining,
            max_swipes: report.status.max_swipes,
            tier: report.status.tier,
            needs_reset: report.needs_reset,
        }
    }
}

/// Payload of the billing collaborator's subscription webhook.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TierChangeRequest {
    pub user_id: UserId,
    pub tier: Tier,
}
