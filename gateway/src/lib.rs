//! HTTP gateway for voteweb.
//!
//! Translates HTTP requests into admission engine calls and decisions into
//! JSON responses. Every request passes, outermost first, through panic
//! recovery, request-id tagging, tracing, security headers, client identity
//! resolution and the CSRF guard.

pub mod admin;
pub mod client_ip;
pub mod csrf;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod presentation;
pub mod router;
pub mod security;
pub mod state;

pub use client_ip::ClientIdentity;
pub use csrf::{parse_cookie, CsrfToken, CSRF_COOKIE_NAME, CSRF_HEADER_NAME};
pub use error::GatewayError;
pub use metrics::GatewayMetrics;
pub use router::router;
pub use state::{AppState, GatewayConfig};
