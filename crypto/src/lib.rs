//! Cryptographic primitives for voteweb.
//!
//! - **HMAC-SHA256** identity hashing: client addresses are reduced to a
//!   salted 32-byte [`IdentityToken`](voteweb_types::IdentityToken) before
//!   they reach the ledger
//! - Random 256-bit CSRF tokens, URL-safe base64 encoded
//! - Constant-time byte comparison for secrets echoed back by clients

pub mod compare;
pub mod csrf;
pub mod error;
pub mod identity;

pub use compare::constant_time_eq;
pub use csrf::{generate_csrf_token, CSRF_TOKEN_BYTES};
pub use error::CryptoError;
pub use identity::{HashSecret, IdentityHasher};
