//! Client identity resolution for voteweb.
//!
//! Turns the peer address of a connection, plus an optional
//! `X-Forwarded-For` header, into the normalized identity string that the
//! admission engine hashes. Forwarded headers are honoured only when the
//! peer itself sits inside a trusted proxy range.

pub mod cidr;
pub mod client_ip;
pub mod error;

pub use cidr::{Cidr, TrustedProxies, DEFAULT_TRUSTED_PROXY_CIDRS};
pub use client_ip::{normalize_identity, resolve_client_identity};
pub use error::NetworkError;
