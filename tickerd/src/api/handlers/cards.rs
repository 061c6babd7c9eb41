//! Card generation endpoint.

use crate::api::models::cards::{GenerateCardsRequest, GenerateCardsResponse};
use crate::auth::CurrentUser;
use crate::errors::Result;
use crate::AppState;
use axum::{extract::State, response::Json};
use chrono::Utc;

/// Serve a batch of recommendation cards for the caller.
///
/// Returns the cached batch when one is still fresh; otherwise generates a
/// new one. Reading cards never consumes swipe quota.
#[utoipa::path(
    post,
    path = "/api/v1/cards/generate",
    tag = "cards",
    request_body = GenerateCardsRequest,
    responses(
        (status = 200, description = "Batch of cards", body = GenerateCardsResponse),
        (status = 400, description = "Count out of range or malformed request"),
        (status = 401, description = "No caller identity"),
        (status = 404, description = "User record missing"),
        (status = 502, description = "Content generator produced no usable cards"),
    )
)]
pub async fn generate_cards(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<GenerateCardsRequest>,
) -> Result<Json<GenerateCardsResponse>> {
    let generated = state
        .cards
        .get_cards(
            &current_user.id,
            &request.profile,
            request.category,
            request.count,
            Utc::now(),
        )
        .await?;

    Ok(Json(GenerateCardsResponse::from(generated)))
}
