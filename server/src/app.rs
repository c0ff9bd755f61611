//! Process wiring: ledger bootstrap, engine construction, HTTP serving.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};
use voteweb_admission::AdmissionEngine;
use voteweb_crypto::IdentityHasher;
use voteweb_gateway::{router, AppState, GatewayMetrics};
use voteweb_store::Ledger;
use voteweb_store_pg::{check_integrity, connect, IntegrityReport, Migrator, PgLedger};

use crate::{seed_catalog, ServerConfig, ServerError, ShutdownController};

/// Connect to PostgreSQL and bring the schema up to date. Refuses to hand
/// out a ledger whose schema fails the integrity check, since vote
/// admission depends on the identity-token uniqueness constraint.
pub async fn open_ledger(config: &ServerConfig) -> Result<PgLedger, ServerError> {
    let pool = connect(&config.pg_options()).await?;
    let version = Migrator::run(&pool).await?;
    info!(schema_version = version, "database schema ready");

    if let Err(e) = require_healthy(check_integrity(&pool).await?) {
        pool.close().await;
        return Err(e);
    }
    Ok(PgLedger::new(pool))
}

/// Turn an integrity report into a startup decision.
pub fn require_healthy(report: IntegrityReport) -> Result<(), ServerError> {
    if report.is_healthy() {
        info!(
            tables = report.tables_checked,
            rows = report.total_rows,
            "integrity check passed"
        );
        Ok(())
    } else {
        for problem in &report.errors {
            error!(problem = %problem, "integrity check failed");
        }
        Err(ServerError::Integrity(report.errors))
    }
}

/// Build the shared handler state over any ledger.
pub fn build_state(config: &ServerConfig, ledger: Arc<dyn Ledger>) -> Result<AppState, ServerError> {
    let hasher = IdentityHasher::new(&config.hash_secret()?)?;
    let engine = AdmissionEngine::new(ledger, hasher).with_timeout(config.request_timeout());
    let gateway = config.gateway_config()?;
    info!(
        trust_proxy = gateway.proxies.is_enabled(),
        admin = gateway.admin_code.is_some(),
        auto_vote_on_view = gateway.auto_vote_on_view,
        voting_open = gateway.voting_open,
        timeout_ms = config.request_timeout_ms,
        "gateway configured"
    );
    Ok(AppState::new(engine, gateway, Arc::new(GatewayMetrics::new())))
}

/// Run the server until `shutdown` fires, then drain in-flight requests.
pub async fn serve(config: &ServerConfig, shutdown: &ShutdownController) -> Result<(), ServerError> {
    config.validate()?;

    let ledger = open_ledger(config).await?;
    if config.seed_on_start {
        seed_catalog(&ledger).await?;
    }

    let state = build_state(config, Arc::new(ledger))?;
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "voteweb listening");

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.signalled())
    .await?;

    info!("voteweb stopped");
    Ok(())
}

/// Apply migrations and exit.
pub async fn run_migrations(config: &ServerConfig) -> Result<i32, ServerError> {
    let pool = connect(&config.pg_options()).await?;
    let version = Migrator::run(&pool).await?;
    pool.close().await;
    Ok(version)
}

/// Upsert the built-in catalog and exit.
pub async fn run_seed(config: &ServerConfig) -> Result<usize, ServerError> {
    let ledger = open_ledger(config).await?;
    let seeded = seed_catalog(&ledger).await?;
    ledger.pool().close().await;
    Ok(seeded)
}
