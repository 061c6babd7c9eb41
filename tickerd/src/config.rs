//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. The file path defaults to `config.yaml` and can be set with
//! `-f` or `TICKERD_CONFIG`.
//!
//! Sources merge in order (later wins):
//!
//! 1. YAML config file
//! 2. `TICKERD_`-prefixed environment variables (`__` separates nesting,
//!    e.g. `TICKERD_OPENAI__MODEL=gpt-4o-mini` sets `openai.model`)
//! 3. `DATABASE_URL` as a special case for `database.url`
//!
//! Every field has a default; a missing config file just means defaults plus
//! environment. Without a `database.url` the service runs on the in-memory
//! store, which is only suitable for local development.

use clap::Parser;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::signing::decode_secret;
use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "TICKERD_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Shorthand for `database.url`, settable via `DATABASE_URL`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// PostgreSQL connection settings
    pub database: DatabaseConfig,
    /// Identity header configuration
    pub auth: AuthConfig,
    /// Content generator settings
    pub openai: OpenAiConfig,
    /// Stock quote enrichment settings
    pub prices: PriceConfig,
    /// Subscription webhook settings
    pub webhooks: WebhookConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: None,
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            openai: OpenAiConfig::default(),
            prices: PriceConfig::default(),
            webhooks: WebhookConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string. `None` selects the in-memory store.
    pub url: Option<String>,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Header carrying the trusted user id set by the identity layer.
    pub identity_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            identity_header: "x-ticker-user".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key for the generation backend
    pub api_key: String,
    /// Override the API base URL (testing, proxies)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Chat model used for card generation
    pub model: String,
    /// Completion token budget per batch
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Hard deadline for one generation attempt (seconds)
    pub timeout_secs: u64,
    /// Pause before the single retry (milliseconds)
    pub retry_backoff_ms: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: None,
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 4000,
            temperature: 0.7,
            timeout_secs: 30,
            retry_backoff_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceConfig {
    /// Alpha Vantage API key; "demo" disables lookups entirely.
    pub api_key: String,
    /// Quote API base URL (overridable for tests)
    pub base_url: String,
    /// Per-request timeout (milliseconds)
    pub timeout_ms: u64,
    /// Delay between consecutive quote lookups (milliseconds)
    pub request_delay_ms: u64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            api_key: "demo".to_string(),
            base_url: "https://www.alphavantage.co".to_string(),
            timeout_ms: 5000,
            request_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebhookConfig {
    /// `whsec_`-prefixed shared secret for subscription webhook signatures.
    /// Unset skips verification (development only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        if let Some(url) = config.database_url.take() {
            config.database.url = Some(url);
        }

        config
            .validate()
            .map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("TICKERD_").split("__"))
            // Common DATABASE_URL pattern
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }

    /// Check consistency beyond what deserialization enforces.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(secret) = &self.webhooks.secret
            && decode_secret(secret).is_none()
        {
            return Err(Error::InvalidArgument {
                message: "webhooks.secret must be a whsec_-prefixed base64 secret".to_string(),
            });
        }

        if self.openai.timeout_secs == 0 {
            return Err(Error::InvalidArgument {
                message: "openai.timeout_secs must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
