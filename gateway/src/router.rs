//! Route table and middleware stack.

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{admin, client_ip, csrf, handlers, security, AppState};

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/metrics", get(handlers::metrics))
        .route("/api/innovations", get(handlers::list_innovations))
        .route("/api/innovations/:group/:slug", get(handlers::innovation_detail))
        .route("/api/vote/:group/:slug", post(handlers::submit_vote));

    if state.config.admin_code.is_some() {
        let admin_routes = Router::new()
            .route("/admin/api/data", get(admin::analytics_data))
            .route_layer(from_fn_with_state(state.clone(), admin::require_admin_code));
        app = app.merge(admin_routes);
        info!(path = "/admin/api/data", "admin routes enabled");
    }

    app.layer(from_fn_with_state(state.clone(), csrf::csrf_guard))
        .layer(from_fn_with_state(state.clone(), client_ip::resolve_identity))
        .layer(from_fn(security::security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
