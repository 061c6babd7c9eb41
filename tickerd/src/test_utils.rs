//! Shared fixtures and fakes for the test suite.
//!
//! Everything runs against [`MemoryStore`] wired through the same service
//! constructors production uses; the only fakes are the generator (scripted
//! responses) and an optionally-failing saved-card store.

use crate::analytics::TracingAnalytics;
use crate::cache::ContentCache;
use crate::config::{Config, PriceConfig};
use crate::db::errors::StoreError;
use crate::db::memory::MemoryStore;
use crate::db::models::SavedCardRow;
use crate::db::store::SavedCardStore;
use crate::generation::prices::StockPriceService;
use crate::generation::{ContentGenerator, GenerationError};
use crate::quota::QuotaLedger;
use crate::seen::SeenCards;
use crate::service::CardService;
use crate::types::{Category, UserProfile};
use crate::AppState;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn test_profile() -> UserProfile {
    UserProfile {
        investment_amount: "$1K - $5K".to_string(),
        risk_level: "moderate".to_string(),
        interests: vec!["technology".to_string()],
    }
}

/// A fully valid stock candidate, as the generator would return it.
pub fn stock_candidate(ticker: &str) -> Value {
    json!({
        "type": "stock",
        "title": format!("{ticker} Corp"),
        "ticker": ticker,
        "price": "$100.00",
        "changePercent": "+1.0%",
        "tagline": "A compelling one-liner",
        "simpleExplainer": "A plain-English explanation long enough to pass quality screening.",
        "goodReasons": ["Strong fundamentals"],
        "concerns": ["Sector volatility"],
        "timeline": "3-5 years",
        "riskLevel": "Medium",
        "beginnerTip": "Start with a small position.",
        "sources": [{"name": "Yahoo Finance", "url": format!("https://finance.yahoo.com/quote/{ticker}")}],
        "getStarted": [{"name": "Fidelity", "description": "Full-service broker", "url": "https://fidelity.com"}]
    })
}

/// A fully valid idea candidate.
pub fn idea_candidate(title: &str) -> Value {
    json!({
        "type": "idea",
        "title": title,
        "category": "Technology",
        "investmentRange": "$10K - $25K",
        "tagline": "A compelling one-liner",
        "simpleExplainer": "A plain-English explanation long enough to pass quality screening.",
        "goodReasons": ["Growing market"],
        "concerns": ["Competitive space"],
        "timeline": "12-18 months",
        "riskLevel": "Medium",
        "beginnerTip": "Validate demand first.",
        "sources": [{"name": "Forbes", "url": "https://www.forbes.com"}],
        "getStarted": [{"name": "Shopify", "description": "Store builder", "url": "https://shopify.com"}]
    })
}

/// What the service asked the generator for, captured per call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub category: Category,
    pub count: u32,
    pub exclude: Vec<String>,
    pub rotation_theme: String,
}

/// Generator fake: returns queued responses in order and records every
/// request. An exhausted script fails loudly so an unexpected generation
/// call can't pass silently.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<Vec<Value>, GenerationError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_batch(&self, candidates: Vec<Value>) {
        self.responses
            .lock()
            .expect("script lock poisoned")
            .push_back(Ok(candidates));
    }

    pub fn push_error(&self, err: GenerationError) {
        self.responses
            .lock()
            .expect("script lock poisoned")
            .push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request lock poisoned").clone()
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        _profile: &UserProfile,
        category: Category,
        count: u32,
        exclude: &[String],
        rotation_theme: &str,
    ) -> Result<Vec<Value>, GenerationError> {
        self.requests
            .lock()
            .expect("request lock poisoned")
            .push(RecordedRequest {
                category,
                count,
                exclude: exclude.to_vec(),
                rotation_theme: rotation_theme.to_string(),
            });

        self.responses
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(GenerationError::Malformed(
                    "generator script exhausted".to_string(),
                ))
            })
    }
}

/// Saved-card store whose inserts can be made to fail, for exercising the
/// swipe-commit / save-bookkeeping asymmetry.
pub struct FailingSavedCards {
    inner: Arc<MemoryStore>,
    pub fail_inserts: AtomicBool,
    pub insert_attempts: AtomicUsize,
}

impl FailingSavedCards {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            fail_inserts: AtomicBool::new(false),
            insert_attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SavedCardStore for FailingSavedCards {
    async fn insert(&self, row: &SavedCardRow) -> Result<(), StoreError> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("saved-card store down".to_string()));
        }
        self.inner.insert(row).await
    }

    async fn remove(&self, user_id: &str, content_id: &str) -> Result<(), StoreError> {
        self.inner.remove(user_id, content_id).await
    }

    async fn contains(&self, user_id: &str, content_id: &str) -> Result<bool, StoreError> {
        self.inner.contains(user_id, content_id).await
    }
}

/// Fully wired service stack on the in-memory store.
pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub generator: Arc<ScriptedGenerator>,
    pub ledger: Arc<QuotaLedger>,
    pub service: Arc<CardService>,
}

pub fn harness() -> TestHarness {
    harness_with_saved(None)
}

/// Build the stack, optionally substituting the saved-card store.
pub fn harness_with_saved(saved: Option<Arc<dyn SavedCardStore>>) -> TestHarness {
    let store = Arc::new(MemoryStore::new());
    let generator = Arc::new(ScriptedGenerator::new());
    let ledger = Arc::new(QuotaLedger::new(store.clone()));
    let saved: Arc<dyn SavedCardStore> =
        saved.unwrap_or_else(|| store.clone() as Arc<dyn SavedCardStore>);

    let service = Arc::new(CardService::new(
        ledger.clone(),
        ContentCache::new(store.clone()),
        SeenCards::new(store.clone()),
        saved,
        generator.clone(),
        Arc::new(StockPriceService::new(&PriceConfig::default())),
        Arc::new(TracingAnalytics),
    ));

    TestHarness {
        store,
        generator,
        ledger,
        service,
    }
}

pub fn test_state(harness: &TestHarness) -> AppState {
    test_state_with_config(harness, Config::default())
}

pub fn test_state_with_config(harness: &TestHarness, config: Config) -> AppState {
    AppState {
        config,
        cards: harness.service.clone(),
        ledger: harness.ledger.clone(),
    }
}
