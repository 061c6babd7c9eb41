//! Content-generation collaborator.
//!
//! The card service only knows the [`ContentGenerator`] trait; production
//! wires in [`openai::OpenAiGenerator`], tests wire in a scripted fake.
//! Generators return *untyped* JSON candidates — screening and typing happen
//! in [`crate::cards::validation`], so one hallucinated field never poisons a
//! whole batch.

pub mod openai;
pub mod prices;

use crate::types::{Category, UserProfile};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("content generator timed out")]
    Timeout,

    #[error("generator returned malformed content: {0}")]
    Malformed(String),

    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Produce `count` candidate records for the category, steering clear of
    /// the excluded identifiers and leaning into the rotation theme.
    async fn generate(
        &self,
        profile: &UserProfile,
        category: Category,
        count: u32,
        exclude: &[String],
        rotation_theme: &str,
    ) -> Result<Vec<Value>, GenerationError>;
}

/// Parse a model response into a JSON array of candidates.
///
/// Models regularly wrap JSON in markdown fences despite instructions not
/// to; the fences are stripped before parsing. An empty or non-array
/// response is malformed.
pub fn parse_card_array(content: &str) -> Result<Vec<Value>, GenerationError> {
    let mut cleaned = content.trim();
    cleaned = cleaned
        .strip_prefix("```json")
        .or_else(|| cleaned.strip_prefix("```"))
        .unwrap_or(cleaned);
    cleaned = cleaned.strip_suffix("```").unwrap_or(cleaned);
    let cleaned = cleaned.trim();

    let parsed: Value = serde_json::from_str(cleaned)
        .map_err(|err| GenerationError::Malformed(format!("invalid JSON: {err}")))?;

    match parsed {
        Value::Array(items) if !items.is_empty() => Ok(items),
        Value::Array(_) => Err(GenerationError::Malformed("empty card array".to_string())),
        _ => Err(GenerationError::Malformed(
            "expected a JSON array of cards".to_string(),
        )),
    }
}
