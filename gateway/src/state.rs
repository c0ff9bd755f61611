//! Shared handler state.

use std::fmt;
use std::sync::Arc;

use voteweb_admission::AdmissionEngine;
use voteweb_network::TrustedProxies;

use crate::GatewayMetrics;

/// Gateway behaviour switches, fixed at startup.
#[derive(Clone)]
pub struct GatewayConfig {
    pub proxies: TrustedProxies,
    /// Shared secret for `/admin/api/*`. `None` leaves the admin routes unmounted.
    pub admin_code: Option<String>,
    /// Record a vote when a visitor first opens an innovation's detail view.
    pub auto_vote_on_view: bool,
    /// Kill switch for the submission endpoint.
    pub voting_open: bool,
    /// Add `Secure` to the CSRF cookie.
    pub secure_cookies: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            proxies: TrustedProxies::disabled(),
            admin_code: None,
            auto_vote_on_view: false,
            voting_open: true,
            secure_cookies: false,
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("proxies", &self.proxies)
            .field("admin_code", &self.admin_code.as_ref().map(|_| "<redacted>"))
            .field("auto_vote_on_view", &self.auto_vote_on_view)
            .field("voting_open", &self.voting_open)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AdmissionEngine>,
    pub config: Arc<GatewayConfig>,
    pub metrics: Arc<GatewayMetrics>,
}

impl AppState {
    pub fn new(engine: AdmissionEngine, config: GatewayConfig, metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            engine: Arc::new(engine),
            config: Arc::new(config),
            metrics,
        }
    }
}
