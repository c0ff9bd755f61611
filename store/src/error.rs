use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("stored data is corrupted: {0}")]
    Corruption(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
