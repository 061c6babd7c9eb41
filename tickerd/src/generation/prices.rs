//! Real-time stock quote enrichment (Alpha Vantage).
//!
//! Stock candidates come out of the generator with price *estimates*; when an
//! API key is configured, real quotes replace them before validation. The
//! free tier allows 5 calls per minute, so lookups run sequentially with a
//! fixed delay. Every failure falls back to the AI estimate — quotes are an
//! enrichment, never a gate.

use crate::config::PriceConfig;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Sentinel key meaning "no key configured"; lookups short-circuit.
const DEMO_KEY: &str = "demo";

#[derive(Debug, Clone, PartialEq)]
pub struct StockQuote {
    pub symbol: String,
    pub price: String,
    pub change_percent: String,
}

pub struct StockPriceService {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    request_delay: Duration,
}

impl StockPriceService {
    pub fn new(config: &PriceConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("reqwest client construction cannot fail with static options");

        Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_delay: Duration::from_millis(config.request_delay_ms),
        }
    }

    /// Fetch one quote. Returns `None` on any failure so the caller keeps
    /// the generator's estimate.
    pub async fn fetch_quote(&self, ticker: &str) -> Option<StockQuote> {
        if self.api_key == DEMO_KEY {
            tracing::debug!(ticker, "price API key not configured, keeping estimate");
            return None;
        }

        let url = format!("{}/query", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", ticker),
                ("apikey", &self.api_key),
            ])
            .send()
            .await;

        let body: Value = match response {
            Ok(resp) => match resp.json().await {
                Ok(body) => body,
                Err(err) => {
                    tracing::warn!(ticker, %err, "unreadable quote response");
                    return None;
                }
            },
            Err(err) => {
                tracing::warn!(ticker, %err, "quote request failed");
                return None;
            }
        };

        let quote = parse_global_quote(&body, ticker);
        if quote.is_none() {
            tracing::warn!(ticker, "no price data in quote response");
        }
        quote
    }

    /// Replace estimated prices on stock candidates with real quotes where
    /// available. Candidates whose lookup fails keep their estimates.
    pub async fn enrich(&self, candidates: &mut [Value]) {
        if self.api_key == DEMO_KEY {
            return;
        }

        let tickers: Vec<String> = candidates
            .iter()
            .filter_map(|candidate| candidate.get("ticker").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        let mut quotes: HashMap<String, StockQuote> = HashMap::new();
        for (idx, ticker) in tickers.iter().enumerate() {
            if let Some(quote) = self.fetch_quote(ticker).await {
                quotes.insert(ticker.clone(), quote);
            }
            // Stay under the upstream per-minute budget.
            if idx + 1 < tickers.len() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        for candidate in candidates.iter_mut() {
            let Some(ticker) = candidate
                .get("ticker")
                .and_then(Value::as_str)
                .map(str::to_string)
            else {
                continue;
            };
            if let Some(quote) = quotes.get(&ticker)
                && let Some(obj) = candidate.as_object_mut()
            {
                obj.insert("price".to_string(), Value::String(quote.price.clone()));
                obj.insert(
                    "changePercent".to_string(),
                    Value::String(quote.change_percent.clone()),
                );
            }
        }
    }
}

/// Pull a quote out of an Alpha Vantage `GLOBAL_QUOTE` response body.
fn parse_global_quote(body: &Value, symbol: &str) -> Option<StockQuote> {
    let quote = body.get("Global Quote")?;
    let price: f64 = quote.get("05. price")?.as_str()?.parse().ok()?;
    let change: f64 = quote.get("09. change")?.as_str()?.parse().ok()?;
    let change_percent: f64 = quote
        .get("10. change percent")?
        .as_str()?
        .trim_end_matches('%')
        .parse()
        .ok()?;

    let sign = if change >= 0.0 { "+" } else { "-" };
    Some(StockQuote {
        symbol: symbol.to_string(),
        price: format!("${price:.2}"),
        change_percent: format!("{sign}{:.1}%", change_percent.abs()),
    })
}
