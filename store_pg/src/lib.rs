//! PostgreSQL ledger backend for voteweb.
//!
//! Implements the `voteweb-store` traits over a `sqlx` connection pool. The
//! single-vote-per-identity rule is enforced by the `UNIQUE` constraint on
//! `votes.voter_identity_token`; [`PgLedger::insert_vote`] is an
//! `INSERT ... ON CONFLICT DO NOTHING`, so concurrent submissions from any
//! number of processes resolve to exactly one stored vote.

pub mod environment;
pub mod error;
pub mod innovation;
pub mod integrity;
pub mod migration;
mod row;
pub mod vote;

use async_trait::async_trait;
use sqlx::PgPool;
use voteweb_store::{Ledger, StoreError};

pub use environment::{connect, PgOptions};
pub use error::PgError;
pub use integrity::{check_integrity, IntegrityReport};
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};

/// Ledger backed by a PostgreSQL pool. Cloning shares the pool.
#[derive(Clone, Debug)]
pub struct PgLedger {
    pool: PgPool,
}

impl PgLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Ledger for PgLedger {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(PgError::from)?;
        Ok(())
    }
}
