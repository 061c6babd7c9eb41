//! Trusted-header identity extraction.
//!
//! Authentication happens in front of this service; by the time a request
//! arrives here, the identity layer has already verified the caller and put
//! their opaque user id in the configured header. Requests without the
//! header are rejected — there is no anonymous surface.

use crate::errors::{Error, Result};
use crate::types::UserId;
use crate::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::trace;

/// The authenticated caller, resolved from the trusted identity header.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let header_name = &state.config.auth.identity_header;

        let value = match parts.headers.get(header_name) {
            Some(value) => value,
            None => {
                trace!("no identity header on request");
                return Err(Error::Unauthenticated { message: None });
            }
        };

        let id = value.to_str().map_err(|_| Error::Unauthenticated {
            message: Some("identity header is not valid UTF-8".to_string()),
        })?;

        if id.trim().is_empty() {
            return Err(Error::Unauthenticated {
                message: Some("identity header is empty".to_string()),
            });
        }

        Ok(CurrentUser { id: id.to_string() })
    }
}
