//! Attach the resolved client identity to every request.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use voteweb_network::resolve_client_identity;

use crate::AppState;

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Normalized client identity (host only). Empty when the peer address is
/// unknown, which the engine rejects as invalid input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientIdentity(pub String);

impl ClientIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        !self.0.is_empty()
    }
}

pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();
    let forwarded = request
        .headers()
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok());

    let identity = resolve_client_identity(&peer, forwarded, &state.config.proxies);
    request.extensions_mut().insert(ClientIdentity(identity));
    next.run(request).await
}
