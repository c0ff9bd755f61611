//! Startup integrity checks.
//!
//! Run after migration to detect a damaged or hand-edited schema before the
//! gateway starts admitting votes.

use sqlx::PgPool;

use crate::PgError;

/// Summary of an integrity check run.
#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub tables_checked: u32,
    pub total_rows: i64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

const EXPECTED_TABLES: &[&str] = &["innovations", "votes", "schema_meta"];

/// Check that the expected tables exist, count their rows, and confirm the
/// identity-token uniqueness constraint is still in place.
pub async fn check_integrity(pool: &PgPool) -> Result<IntegrityReport, PgError> {
    let mut report = IntegrityReport::default();

    for &table in EXPECTED_TABLES {
        let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
            .bind(table)
            .fetch_one(pool)
            .await?;
        if !exists {
            report.errors.push(format!("missing table '{}'", table));
            continue;
        }

        report.tables_checked += 1;
        let query = format!("SELECT COUNT(*) FROM {}", table);
        match sqlx::query_scalar::<_, i64>(&query).fetch_one(pool).await {
            Ok(count) => report.total_rows += count,
            Err(e) => report
                .errors
                .push(format!("failed to read table '{}': {}", table, e)),
        }
    }

    let unique_token: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM pg_index i
            JOIN pg_attribute a ON a.attrelid = i.indrelid AND a.attnum = ANY (i.indkey)
            WHERE i.indrelid = to_regclass('votes')
              AND i.indisunique
              AND i.indnatts = 1
              AND a.attname = 'voter_identity_token'
        )",
    )
    .fetch_one(pool)
    .await?;
    if !unique_token {
        report
            .errors
            .push("votes.voter_identity_token is not unique".to_string());
    }

    Ok(report)
}
