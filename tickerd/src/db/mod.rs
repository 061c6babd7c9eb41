//! Storage layer.
//!
//! The service layer talks to storage exclusively through the trait seams in
//! [`store`]; two implementations exist:
//!
//! - [`postgres::PgStore`]: sqlx/PostgreSQL, the production backend. Quota
//!   transactions serialize per user with `SELECT … FOR UPDATE`.
//! - [`memory::MemoryStore`]: in-process maps, used by the test suite and by
//!   deployments started without a `database.url` (local development). Quota
//!   transactions serialize on a per-user async mutex.
//!
//! Migrations for the Postgres backend live in `migrations/` and run on
//! startup via [`crate::migrator`].

pub mod errors;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;
