use thiserror::Error;
use voteweb_store::StoreError;

#[derive(Debug, Error)]
pub enum PgError {
    #[error("PostgreSQL error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(String),
}

/// SQLSTATE class 23: integrity constraint violation.
fn is_constraint_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().is_some_and(|code| code.starts_with("23")),
        _ => false,
    }
}

impl From<PgError> for StoreError {
    fn from(e: PgError) -> Self {
        match e {
            PgError::Sqlx(ref inner) if is_constraint_violation(inner) => {
                StoreError::Constraint(e.to_string())
            }
            PgError::Sqlx(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_),
            ) => StoreError::Unavailable(e.to_string()),
            PgError::Sqlx(sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_)) => {
                StoreError::Corruption(e.to_string())
            }
            PgError::Sqlx(_) | PgError::Migration(_) => StoreError::Backend(e.to_string()),
        }
    }
}
