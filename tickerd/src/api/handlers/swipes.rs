//! Swipe tracking, undo, and status endpoints.

use crate::api::models::swipes::{SwipeResponse, SwipeStatusResponse, TrackSwipeRequest};
use crate::auth::CurrentUser;
use crate::errors::Result;
use crate::AppState;
use axum::{extract::State, response::Json};
use chrono::Utc;

/// Record a swipe against the caller's daily quota.
#[utoipa::path(
    post,
    path = "/api/v1/swipes",
    tag = "swipes",
    request_body = TrackSwipeRequest,
    responses(
        (status = 200, description = "Swipe recorded", body = SwipeResponse),
        (status = 401, description = "No caller identity"),
        (status = 404, description = "User record missing"),
        (status = 429, description = "Daily limit reached; body carries tier and maxSwipes"),
    )
)]
pub async fn track_swipe(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<TrackSwipeRequest>,
) -> Result<Json<SwipeResponse>> {
    let status = state
        .cards
        .track_swipe(
            &current_user.id,
            &request.content_id,
            request.direction,
            Utc::now(),
        )
        .await?;

    Ok(Json(SwipeResponse::from(status)))
}

/// Undo the caller's most recent swipe.
#[utoipa::path(
    post,
    path = "/api/v1/swipes/undo",
    tag = "swipes",
    request_body = TrackSwipeRequest,
    responses(
        (status = 200, description = "Swipe undone", body = SwipeResponse),
        (status = 401, description = "No caller identity"),
        (status = 404, description = "User record missing"),
    )
)]
pub async fn undo_swipe(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<TrackSwipeRequest>,
) -> Result<Json<SwipeResponse>> {
    let status = state
        .cards
        .undo_swipe(
            &current_user.id,
            &request.content_id,
            request.direction,
            Utc::now(),
        )
        .await?;

    Ok(Json(SwipeResponse::from(status)))
}

/// Read-only quota status for the caller. Never mutates stored state, even
/// across a day boundary.
#[utoipa::path(
    get,
    path = "/api/v1/swipes/status",
    tag = "swipes",
    responses(
        (status = 200, description = "Current quota status", body = SwipeStatusResponse),
        (status = 401, description = "No caller identity"),
        (status = 404, description = "User record missing"),
    )
)]
pub async fn get_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<SwipeStatusResponse>> {
    let report = state.cards.status(&current_user.id, Utc::now()).await?;

    Ok(Json(SwipeStatusResponse::from(report)))
}
