//! DTOs for card generation.

use crate::cards::Card;
use crate::service::GeneratedCards;
use crate::types::{Category, UserProfile};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCardsRequest {
    pub profile: UserProfile,
    /// Accepts the legacy `type` key the first mobile releases send.
    #[serde(alias = "type")]
    pub category: Category,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCardsResponse {
    #[schema(value_type = Vec<Object>)]
    pub cards: Vec<Card>,
    /// Whether the batch came from the 24h cache rather than a fresh
    /// generation call.
    pub cached: bool,
}

impl From<GeneratedCards> for GenerateCardsResponse {
    fn from(generated: GeneratedCards) -> Self {
        Self {
            cards: generated.cards,
            cached: generated.cached,
        }
    }
}
