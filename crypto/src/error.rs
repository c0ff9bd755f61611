use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("identity hash secret must not be empty")]
    EmptySecret,

    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),
}
