//! OpenAI-backed content generator.
//!
//! One chat completion per batch, bounded by a hard timeout. A failed or
//! timed-out attempt gets exactly one retry after a short backoff; the
//! upstream API has its own congestion problems and a retry storm from every
//! card request would make them ours too.

use crate::cards::prompts::{SYSTEM_PROMPT, build_prompt};
use crate::config::OpenAiConfig;
use crate::generation::{ContentGenerator, GenerationError, parse_card_array};
use crate::types::{Category, UserProfile};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub struct OpenAiGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
    retry_backoff: Duration,
}

impl OpenAiGenerator {
    pub fn new(config: &OpenAiConfig) -> Self {
        let mut client_config = OpenAIConfig::new().with_api_key(&config.api_key);
        if let Some(base) = &config.api_base {
            client_config = client_config.with_api_base(base);
        }

        Self {
            client: Client::with_config(client_config),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()
                    .map_err(anyhow::Error::from)?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()
                    .map_err(anyhow::Error::from)?
                    .into(),
            ])
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
            .map_err(anyhow::Error::from)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(anyhow::Error::from)?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(GenerationError::Malformed(
                "completion had no content".to_string(),
            ));
        }
        Ok(content)
    }

    async fn attempt(&self, prompt: &str) -> Result<Vec<Value>, GenerationError> {
        match tokio::time::timeout(self.timeout, self.complete(prompt)).await {
            Ok(Ok(content)) => parse_card_array(&content),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(GenerationError::Timeout),
        }
    }
}

#[async_trait]
impl ContentGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        profile: &UserProfile,
        category: Category,
        count: u32,
        exclude: &[String],
        rotation_theme: &str,
    ) -> Result<Vec<Value>, GenerationError> {
        let prompt = build_prompt(profile, category, count, exclude, rotation_theme);
        tracing::debug!(%category, count, excluded = exclude.len(), "requesting card batch");

        match self.attempt(&prompt).await {
            Ok(candidates) => Ok(candidates),
            Err(first_err) => {
                tracing::warn!(%first_err, "generation attempt failed, retrying once");
                tokio::time::sleep(self.retry_backoff).await;
                self.attempt(&prompt).await
            }
        }
    }
}
