//! # tickerd: swipe-credit accounting and card-generation backend
//!
//! `tickerd` is the backend behind the Ticker card-swiping mobile client. It
//! enforces a per-user daily swipe quota, serves AI-generated recommendation
//! cards ("stocks" and "ideas") out of a 24-hour cache, tracks which cards a
//! user has already seen so regenerated batches stay fresh, and supports an
//! atomic undo of the most recent quota-consuming swipe.
//!
//! ## Architecture
//!
//! The HTTP layer ([`api`], built on [Axum](https://github.com/tokio-rs/axum))
//! exposes four client operations — generate cards, track a swipe, undo a
//! swipe, read quota status — plus two collaborator endpoints: a signed
//! subscription webhook from billing and a provisioning call from the
//! identity layer. Caller identity arrives as a trusted header resolved by
//! the identity layer in front of this service ([`auth`]).
//!
//! Domain logic lives in three services composed by [`service::CardService`]:
//!
//! - [`quota::QuotaLedger`] owns the per-user daily counter. Every mutation
//!   is a pure state transition executed through the storage layer's
//!   per-user transaction primitive, so concurrent swipes from two devices
//!   serialize and partial state is never visible. The consume path is the
//!   only place the daily UTC reset happens.
//! - [`cache::ContentCache`] keeps the last generated batch per user and
//!   category, valid for 24 hours, judged at read time.
//! - [`seen::SeenCards`] is the append-only ledger of shown cards feeding
//!   the generator's exclusion list.
//!
//! Content comes from the [`generation`] collaborator (OpenAI chat
//! completions, with stock quotes layered in from Alpha Vantage). Raw
//! generator output is screened by [`cards::validation`] — invalid candidates
//! are dropped, broken links repaired — before anything is cached or served.
//!
//! Persistence ([`db`]) is PostgreSQL via sqlx; an in-memory implementation
//! of the same storage traits backs the test suite and url-less development
//! runs.
//!
//! ## Quick start
//!
//! ```no_run
//! use clap::Parser;
//! use tickerd::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = tickerd::config::Args::parse();
//!     let config = Config::load(&args)?;
//!     tickerd::telemetry::init_telemetry()?;
//!
//!     Application::new(config).await?.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     }).await
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod auth;
pub mod cache;
pub mod cards;
pub mod config;
pub mod dates;
pub mod db;
pub mod errors;
pub mod generation;
pub mod quota;
pub mod seen;
pub mod service;
pub mod telemetry;
pub mod types;

#[cfg(test)]
mod test;
#[cfg(test)]
pub mod test_utils;

use crate::analytics::{AnalyticsSink, TracingAnalytics};
use crate::cache::ContentCache;
use crate::db::memory::MemoryStore;
use crate::db::postgres::PgStore;
use crate::db::store::{BatchCache, QuotaStore, SavedCardStore, SeenCardLog};
use crate::generation::openai::OpenAiGenerator;
use crate::generation::prices::StockPriceService;
use crate::generation::ContentGenerator;
use crate::quota::QuotaLedger;
use crate::seen::SeenCards;
use crate::service::CardService;
use axum::Router;
pub use config::Config;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub cards: Arc<CardService>,
    pub ledger: Arc<QuotaLedger>,
}

/// Get the tickerd database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

struct StorageHandles {
    quota: Arc<dyn QuotaStore>,
    seen: Arc<dyn SeenCardLog>,
    cache: Arc<dyn BatchCache>,
    saved: Arc<dyn SavedCardStore>,
    pool: Option<PgPool>,
}

async fn setup_storage(config: &Config) -> anyhow::Result<StorageHandles> {
    match &config.database.url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
                .connect(url)
                .await?;

            migrator().run(&pool).await?;
            info!("connected to PostgreSQL and ran migrations");

            let store = Arc::new(PgStore::new(pool.clone()));
            Ok(StorageHandles {
                quota: store.clone(),
                seen: store.clone(),
                cache: store.clone(),
                saved: store,
                pool: Some(pool),
            })
        }
        None => {
            tracing::warn!(
                "no database.url configured; using the in-memory store (state is lost on restart)"
            );
            let store = Arc::new(MemoryStore::new());
            Ok(StorageHandles {
                quota: store.clone(),
                seen: store.clone(),
                cache: store.clone(),
                saved: store,
                pool: None,
            })
        }
    }
}

fn build_state(config: Config, storage: &StorageHandles) -> AppState {
    let ledger = Arc::new(QuotaLedger::new(storage.quota.clone()));
    let generator: Arc<dyn ContentGenerator> = Arc::new(OpenAiGenerator::new(&config.openai));
    let prices = Arc::new(StockPriceService::new(&config.prices));
    let analytics: Arc<dyn AnalyticsSink> = Arc::new(TracingAnalytics);

    let cards = Arc::new(CardService::new(
        ledger.clone(),
        ContentCache::new(storage.cache.clone()),
        SeenCards::new(storage.seen.clone()),
        storage.saved.clone(),
        generator,
        prices,
        analytics,
    ));

    AppState {
        config,
        cards,
        ledger,
    }
}

/// Main application struct owning the router and storage lifecycle.
///
/// 1. **Create**: [`Application::new`] connects storage, runs migrations,
///    and wires the services.
/// 2. **Serve**: [`Application::serve`] binds the port and handles requests
///    until the shutdown future resolves.
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let storage = setup_storage(&config).await?;
        let state = build_state(config.clone(), &storage);
        let router = api::router(state);

        Ok(Self {
            router,
            config,
            pool: storage.pool,
        })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("tickerd listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(pool) = self.pool {
            info!("closing database connections");
            pool.close().await;
        }

        Ok(())
    }
}
