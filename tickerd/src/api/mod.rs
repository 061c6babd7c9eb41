//! HTTP API surface.
//!
//! Four client-facing operations under `/api/v1`, two collaborator endpoints
//! under `/internal/api/v1`, a liveness probe, and the OpenAPI document.

pub mod handlers;
pub mod models;

use crate::AppState;
use axum::{
    response::Json,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::cards::generate_cards,
        handlers::swipes::track_swipe,
        handlers::swipes::undo_swipe,
        handlers::swipes::get_status,
        handlers::webhooks::subscription_changed,
        handlers::webhooks::provision_user,
    ),
    components(schemas(
        models::cards::GenerateCardsRequest,
        models::cards::GenerateCardsResponse,
        models::swipes::TrackSwipeRequest,
        models::swipes::SwipeResponse,
        models::swipes::SwipeStatusResponse,
        models::swipes::TierChangeRequest,
    )),
    tags(
        (name = "cards", description = "Card generation and caching"),
        (name = "swipes", description = "Swipe quota tracking and undo"),
        (name = "webhooks", description = "Billing and identity collaborator endpoints"),
    )
)]
pub struct ApiDoc;

async fn health() -> &'static str {
    "ok"
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/openapi.json", get(openapi_spec))
        .route("/api/v1/cards/generate", post(handlers::cards::generate_cards))
        .route("/api/v1/swipes", post(handlers::swipes::track_swipe))
        .route("/api/v1/swipes/undo", post(handlers::swipes::undo_swipe))
        .route("/api/v1/swipes/status", get(handlers::swipes::get_status))
        .route(
            "/internal/api/v1/webhooks/subscription",
            post(handlers::webhooks::subscription_changed),
        )
        .route(
            "/internal/api/v1/users/{user_id}",
            put(handlers::webhooks::provision_user),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
