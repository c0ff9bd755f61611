use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("config error: {0}")]
    Config(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] voteweb_crypto::CryptoError),

    #[error("network error: {0}")]
    Network(#[from] voteweb_network::NetworkError),

    #[error("store error: {0}")]
    Store(#[from] voteweb_store::StoreError),

    #[error("database error: {0}")]
    Database(#[from] voteweb_store_pg::PgError),

    #[error("ledger integrity check failed: {}", .0.join("; "))]
    Integrity(Vec<String>),

    #[error("logging already initialised: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
