//! Database schema migration engine.
//!
//! Tracks a monotonically increasing schema version in the `schema_meta`
//! table and runs sequential migrations to bring an older database up to
//! date. Each step runs in its own transaction under an advisory lock, so
//! several processes starting at once migrate exactly once.

use sqlx::{PgPool, Postgres, Transaction};

use crate::PgError;

/// The schema version that the current code expects.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Arbitrary key for `pg_advisory_xact_lock`, shared by all voteweb processes.
const MIGRATION_LOCK_KEY: i64 = 0x766f_7465_7765_62;

const SCHEMA_V1: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS innovations (
        id UUID PRIMARY KEY,
        group_slug TEXT NOT NULL,
        slug TEXT NOT NULL,
        name TEXT NOT NULL,
        division TEXT,
        entity_name TEXT,
        pic TEXT,
        description TEXT,
        logo_innovation_url TEXT,
        logo_entity_url TEXT,
        video_url TEXT,
        slide_url TEXT,
        ig_url TEXT,
        yt_url TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (group_slug, slug)
    )",
    "CREATE TABLE IF NOT EXISTS votes (
        id BIGSERIAL PRIMARY KEY,
        innovation_id UUID NOT NULL REFERENCES innovations (id),
        voter_identity_token BYTEA NOT NULL UNIQUE
            CHECK (octet_length(voter_identity_token) = 32),
        user_agent TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS votes_innovation_id_idx ON votes (innovation_id)",
];

/// Runs database migrations to bring the schema up to date.
pub struct Migrator;

impl Migrator {
    /// Check the stored schema version and run any needed migrations.
    ///
    /// - Version 0 means a fresh database (no version stored yet).
    /// - If the stored version matches `CURRENT_SCHEMA_VERSION`, this is a no-op.
    /// - A stored version *higher* than this code supports means the database
    ///   was written by a newer release and we refuse to touch it.
    pub async fn run(pool: &PgPool) -> Result<i32, PgError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_meta (key TEXT PRIMARY KEY, value INTEGER NOT NULL)",
        )
        .execute(pool)
        .await?;

        let mut tx = pool.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let current = schema_version(&mut tx).await?;

        if current == CURRENT_SCHEMA_VERSION {
            tx.commit().await?;
            tracing::info!(version = current, "database schema is up to date");
            return Ok(current);
        }

        if current > CURRENT_SCHEMA_VERSION {
            return Err(PgError::Migration(format!(
                "database schema version {} is newer than supported version {}",
                current, CURRENT_SCHEMA_VERSION
            )));
        }

        for version in current..CURRENT_SCHEMA_VERSION {
            tracing::info!(from = version, to = version + 1, "running migration");
            for statement in migration_steps(version, version + 1)? {
                sqlx::query(statement).execute(&mut *tx).await?;
            }
        }

        sqlx::query(
            "INSERT INTO schema_meta (key, value) VALUES ('schema_version', $1) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(CURRENT_SCHEMA_VERSION)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(version = CURRENT_SCHEMA_VERSION, "migration complete");
        Ok(CURRENT_SCHEMA_VERSION)
    }
}

async fn schema_version(tx: &mut Transaction<'_, Postgres>) -> Result<i32, PgError> {
    let version: Option<i32> =
        sqlx::query_scalar("SELECT value FROM schema_meta WHERE key = 'schema_version'")
            .fetch_optional(&mut **tx)
            .await?;
    Ok(version.unwrap_or(0))
}

fn migration_steps(from: i32, to: i32) -> Result<&'static [&'static str], PgError> {
    match (from, to) {
        (0, 1) => Ok(SCHEMA_V1),
        _ => Err(PgError::Migration(format!(
            "unknown migration: {} -> {}",
            from, to
        ))),
    }
}
