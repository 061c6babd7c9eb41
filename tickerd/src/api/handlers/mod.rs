//! HTTP request handlers.
//!
//! Handlers stay thin: extract identity and the DTO, delegate to the
//! services on [`crate::AppState`], convert the result. All policy lives in
//! the service layer.

pub mod cards;
pub mod swipes;
pub mod webhooks;
