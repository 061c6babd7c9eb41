//! Request-level error taxonomy and HTTP mapping.
//!
//! Every failure a client can observe is one of these variants. Storage and
//! upstream-generator error shapes are folded into the taxonomy here; they are
//! never serialized to clients directly.

use crate::db::errors::StoreError;
use crate::types::Tier;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Identity header absent or unusable
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Referenced record does not exist (this core does not auto-provision on reads)
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    /// Malformed request data
    #[error("{message}")]
    InvalidArgument { message: String },

    /// Daily swipe quota is spent; carries tier data for client messaging
    #[error("Daily swipe limit reached")]
    ResourceExhausted { tier: Tier, max_swipes: u32 },

    /// The content generator produced zero usable records
    #[error("Card generation failed: {message}")]
    GenerationFailed { message: String },

    /// Storage operation error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            Error::ResourceExhausted { .. } => StatusCode::TOO_MANY_REQUESTS,
            Error::GenerationFailed { .. } => StatusCode::BAD_GATEWAY,
            Error::Store(store_err) => match store_err {
                StoreError::NotFound => StatusCode::NOT_FOUND,
                StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                StoreError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message
                .clone()
                .unwrap_or_else(|| "Authentication required".to_string()),
            Error::NotFound { resource, id } => format!("{resource} {id} not found"),
            Error::InvalidArgument { message } => message.clone(),
            Error::ResourceExhausted { .. } => "Daily swipe limit reached".to_string(),
            Error::GenerationFailed { .. } => {
                "No valid cards could be generated. Please try again.".to_string()
            }
            Error::Store(store_err) => match store_err {
                StoreError::NotFound => "Resource not found".to_string(),
                StoreError::Unavailable(_) => {
                    "Service temporarily unavailable, please retry".to_string()
                }
                StoreError::Other(_) => "Storage error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details server-side, with level matched to severity
        match &self {
            Error::Store(StoreError::Other(_)) | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Store(StoreError::Unavailable(_)) => {
                tracing::warn!("Storage unavailable: {}", self);
            }
            Error::GenerationFailed { .. } => {
                tracing::warn!("Generation error: {}", self);
            }
            Error::Unauthenticated { .. } => {
                tracing::info!("Authentication error: {}", self);
            }
            Error::NotFound { .. } | Error::InvalidArgument { .. } => {
                tracing::debug!("Client error: {}", self);
            }
            Error::ResourceExhausted { .. } | Error::Store(StoreError::NotFound) => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();

        match &self {
            // Quota exhaustion carries structured data the client renders in
            // its paywall / limit messaging.
            Error::ResourceExhausted { tier, max_swipes } => {
                let body = serde_json::json!({
                    "message": self.user_message(),
                    "tier": tier,
                    "maxSwipes": max_swipes,
                });
                (status, axum::response::Json(body)).into_response()
            }
            _ => (status, self.user_message()).into_response(),
        }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
