//! Collaborator-facing endpoints: the billing webhook and user provisioning.
//!
//! These live under `/internal/` and are not reachable through the mobile
//! client's gateway route. The subscription webhook is HMAC-verified when a
//! secret is configured; provisioning is called by the identity layer when it
//! first sees a user.

use crate::api::models::swipes::{SwipeResponse, TierChangeRequest};
use crate::auth::signing::verify_signature;
use crate::errors::{Error, Result};
use crate::types::UserId;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use chrono::Utc;

fn required_header<'h>(headers: &'h HeaderMap, name: &'static str) -> Result<&'h str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::Unauthenticated {
            message: Some(format!("missing {name} header")),
        })
}

/// Apply a subscription change from the billing collaborator.
///
/// The raw body is verified against the configured webhook secret before
/// anything is parsed. Tier changes grant a full refreshed allotment.
#[utoipa::path(
    post,
    path = "/internal/api/v1/webhooks/subscription",
    tag = "webhooks",
    request_body = TierChangeRequest,
    responses(
        (status = 204, description = "Tier applied"),
        (status = 400, description = "Malformed payload"),
        (status = 401, description = "Missing or invalid signature"),
        (status = 404, description = "User record missing"),
    )
)]
pub async fn subscription_changed(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    if let Some(secret) = &state.config.webhooks.secret {
        let msg_id = required_header(&headers, "webhook-id")?;
        let timestamp: i64 = required_header(&headers, "webhook-timestamp")?
            .parse()
            .map_err(|_| Error::Unauthenticated {
                message: Some("webhook-timestamp is not a unix timestamp".to_string()),
            })?;
        let signature = required_header(&headers, "webhook-signature")?;
        let payload = std::str::from_utf8(&body).map_err(|_| Error::InvalidArgument {
            message: "webhook payload is not UTF-8".to_string(),
        })?;

        if !verify_signature(msg_id, timestamp, payload, signature, secret) {
            return Err(Error::Unauthenticated {
                message: Some("invalid webhook signature".to_string()),
            });
        }
    } else {
        tracing::warn!("subscription webhook accepted without signature verification (no secret configured)");
    }

    let request: TierChangeRequest =
        serde_json::from_slice(&body).map_err(|err| Error::InvalidArgument {
            message: format!("invalid webhook payload: {err}"),
        })?;

    state
        .ledger
        .set_tier(&request.user_id, request.tier)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Provision a quota record for a user the identity layer just created.
/// Idempotent: an existing record is returned untouched.
#[utoipa::path(
    put,
    path = "/internal/api/v1/users/{user_id}",
    tag = "webhooks",
    params(("user_id" = String, Path, description = "Opaque user identifier")),
    responses(
        (status = 200, description = "Quota record (created or existing)", body = SwipeResponse),
    )
)]
pub async fn provision_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<SwipeResponse>> {
    let status = state.ledger.provision(&user_id, Utc::now()).await?;

    Ok(Json(SwipeResponse::from(status)))
}
