use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use voteweb_admission::AdmissionEngine;
use voteweb_crypto::{HashSecret, IdentityHasher};
use voteweb_gateway::{router, AppState, GatewayConfig, GatewayMetrics};
use voteweb_network::TrustedProxies;
use voteweb_nullables::{FailPoint, NullLedger};

const DETAIL: &str = "/api/innovations/pemprov-jabar/jabar-digital-academy";
const VOTE: &str = "/api/vote/pemprov-jabar/jabar-digital-academy";
const TOKEN: &str = "dGVzdC10b2tlbi10ZXN0LXRva2VuLXRlc3QtdG9rZW4=";

struct TestApp {
    ledger: Arc<NullLedger>,
    metrics: Arc<GatewayMetrics>,
    router: Router,
}

fn app_with(config: GatewayConfig) -> TestApp {
    let ledger = Arc::new(NullLedger::new());
    ledger.add_innovation("pemprov-jabar", "jabar-digital-academy", "Jabar Digital Academy");
    ledger.add_innovation("pemprov-jabar", "jabar-form", "Jabar Form");
    let hasher = IdentityHasher::new(&HashSecret::new("gateway-test").unwrap()).unwrap();
    let engine = AdmissionEngine::new(ledger.clone(), hasher);
    let metrics = Arc::new(GatewayMetrics::new());
    let state = AppState::new(engine, config, metrics.clone());
    TestApp {
        ledger,
        metrics,
        router: router(state),
    }
}

fn app() -> TestApp {
    app_with(GatewayConfig::default())
}

fn request(method: Method, uri: &str, peer: &str) -> axum::http::request::Builder {
    let addr: SocketAddr = peer.parse().unwrap();
    Request::builder()
        .method(method)
        .uri(uri)
        .extension(ConnectInfo(addr))
}

fn vote_from(peer: &str, cookie: Option<&str>, header_token: Option<&str>) -> Request<Body> {
    let mut builder = request(Method::POST, VOTE, peer).header(header::USER_AGENT, "Mozilla/5.0");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, format!("csrf_token={}", cookie));
    }
    if let Some(token) = header_token {
        builder = builder.header("X-CSRF-Token", token);
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

async fn json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ── CSRF guard ──────────────────────────────────────────────────────────

#[tokio::test]
async fn vote_without_header_token_is_rejected() {
    let app = app();
    let response = send(&app, vote_from("203.0.113.5:4000", Some(TOKEN), None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.ledger.stored_votes(), 0);
    assert_eq!(app.metrics.csrf_rejections.get(), 1);
}

#[tokio::test]
async fn vote_without_cookie_is_rejected() {
    let app = app();
    let response = send(&app, vote_from("203.0.113.5:4000", None, Some(TOKEN))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.ledger.stored_votes(), 0);
}

#[tokio::test]
async fn vote_with_mismatched_tokens_is_rejected() {
    let app = app();
    let response = send(&app, vote_from("203.0.113.5:4000", Some(TOKEN), Some("forged"))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json(response).await;
    assert_eq!(body["error"], "CSRF token mismatch");
    assert_eq!(app.ledger.stored_votes(), 0);
}

#[tokio::test]
async fn safe_request_receives_cookie_and_token() {
    let app = app();
    let response = send(&app, request(Method::GET, DETAIL, "203.0.113.5:4000").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=3600"));

    let body = json(response).await;
    let token = body["csrf_token"].as_str().unwrap();
    assert!(cookie.starts_with(&format!("csrf_token={};", token)));
    assert_eq!(body["has_voted"], false);
    assert_eq!(body["vote_count"], 0);
    assert_eq!(body["innovation"]["name"], "Jabar Digital Academy");
    assert_eq!(body["hero_image"], "/static/img/hero/jabar-digital-academy.jpg");
}

#[tokio::test]
async fn existing_cookie_is_reused() {
    let app = app();
    let response = send(
        &app,
        request(Method::GET, DETAIL, "203.0.113.5:4000")
            .header(header::COOKIE, format!("csrf_token={}", TOKEN))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(json(response).await["csrf_token"], TOKEN);
}

// ── Submission ──────────────────────────────────────────────────────────

#[tokio::test]
async fn vote_flow_accept_then_conflict() {
    let app = app();

    let response = send(&app, vote_from("203.0.113.5:4000", Some(TOKEN), Some(TOKEN))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["vote_count"], 1);
    assert_eq!(body["message"], "Vote berhasil dicatat");

    let response = send(&app, vote_from("203.0.113.5:5000", Some(TOKEN), Some(TOKEN))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json(response).await;
    assert_eq!(body["error"], "already_voted");
    assert_eq!(body["vote_count"], 0);
    assert!(body["message"].as_str().unwrap().contains("Jabar Digital Academy"));

    let response = send(&app, vote_from("203.0.113.6:4000", Some(TOKEN), Some(TOKEN))).await;
    assert_eq!(json(response).await["vote_count"], 2);
    assert_eq!(app.metrics.votes_accepted.get(), 2);
    assert_eq!(app.metrics.votes_already_voted.get(), 1);
}

#[tokio::test]
async fn unknown_innovation_is_404() {
    let app = app();
    let response = send(
        &app,
        request(Method::POST, "/api/vote/no-such-group/no-such-slug", "203.0.113.5:4000")
            .header(header::COOKIE, format!("csrf_token={}", TOKEN))
            .header("X-CSRF-Token", TOKEN)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(response).await["error"], "innovation_not_found");
    assert_eq!(app.ledger.stored_votes(), 0);
}

#[tokio::test]
async fn closed_voting_bypasses_the_engine() {
    let app = app_with(GatewayConfig {
        voting_open: false,
        ..GatewayConfig::default()
    });
    app.ledger.fail(FailPoint::HasVoted);

    let response = send(&app, vote_from("203.0.113.5:4000", Some(TOKEN), Some(TOKEN))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json(response).await["error"], "voting_closed");
    assert_eq!(app.ledger.stored_votes(), 0);
}

#[tokio::test]
async fn storage_failure_is_500_without_details() {
    let app = app();
    app.ledger.fail(FailPoint::InsertVote);
    let response = send(&app, vote_from("203.0.113.5:4000", Some(TOKEN), Some(TOKEN))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json(response).await;
    assert_eq!(body["error"], "Failed to submit vote");
    assert!(!body.to_string().contains("injected"));
    assert_eq!(app.metrics.votes_failed.get(), 1);
}

#[tokio::test]
async fn unknown_peer_is_a_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri(VOTE)
        .header(header::COOKIE, format!("csrf_token={}", TOKEN))
        .header("X-CSRF-Token", TOKEN)
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trusted_proxy_forwards_distinct_clients() {
    let app = app_with(GatewayConfig {
        proxies: TrustedProxies::parse_list("10.0.0.0/8").unwrap(),
        ..GatewayConfig::default()
    });

    for client in ["198.51.100.1", "198.51.100.2"] {
        let mut request = vote_from("10.0.0.2:80", Some(TOKEN), Some(TOKEN));
        request
            .headers_mut()
            .insert("x-forwarded-for", client.parse().unwrap());
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert_eq!(app.ledger.stored_votes(), 2);
}

#[tokio::test]
async fn untrusted_peer_cannot_spoof_forwarded_for() {
    let app = app_with(GatewayConfig {
        proxies: TrustedProxies::parse_list("10.0.0.0/8").unwrap(),
        ..GatewayConfig::default()
    });

    let mut statuses = Vec::new();
    for client in ["198.51.100.1", "198.51.100.2"] {
        let mut request = vote_from("203.0.113.9:80", Some(TOKEN), Some(TOKEN));
        request
            .headers_mut()
            .insert("x-forwarded-for", client.parse().unwrap());
        statuses.push(send(&app, request).await.status());
    }
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);
}

// ── Detail view auto-vote ───────────────────────────────────────────────

fn auto_vote_app() -> TestApp {
    app_with(GatewayConfig {
        auto_vote_on_view: true,
        ..GatewayConfig::default()
    })
}

#[tokio::test]
async fn detail_view_auto_votes_for_humans() {
    let app = auto_vote_app();
    let response = send(
        &app,
        request(Method::GET, DETAIL, "203.0.113.5:4000")
            .header(header::USER_AGENT, "Mozilla/5.0 Firefox/120.0")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let body = json(response).await;
    assert_eq!(body["has_voted"], true);
    assert_eq!(body["vote_count"], 1);
    assert_eq!(app.ledger.stored_votes(), 1);
}

#[tokio::test]
async fn detail_view_skips_bots_and_previews() {
    let app = auto_vote_app();
    send(
        &app,
        request(Method::GET, DETAIL, "203.0.113.5:4000")
            .header(header::USER_AGENT, "Googlebot/2.1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    send(
        &app,
        request(Method::GET, &format!("{}?preview=1", DETAIL), "203.0.113.6:4000")
            .header(header::USER_AGENT, "Mozilla/5.0")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(app.ledger.stored_votes(), 0);
}

#[tokio::test]
async fn detail_for_unknown_innovation_is_404() {
    let app = app();
    let response = send(
        &app,
        request(Method::GET, "/api/innovations/pemprov-jabar/nope", "203.0.113.5:4000")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_groups_innovations_with_counts() {
    let app = app();
    send(&app, vote_from("203.0.113.5:4000", Some(TOKEN), Some(TOKEN))).await;
    let response = send(
        &app,
        request(Method::GET, "/api/innovations", "203.0.113.5:4000")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let body = json(response).await;
    assert_eq!(body["total"], 2);
    let group = &body["groups"][0];
    assert_eq!(group["group_slug"], "pemprov-jabar");
    assert_eq!(group["innovations"][0]["name"], "Jabar Digital Academy");
    assert_eq!(group["innovations"][0]["vote_count"], 1);
    assert_eq!(group["innovations"][1]["vote_count"], 0);
}

// ── Security headers, health, metrics ───────────────────────────────────

#[tokio::test]
async fn security_headers_on_every_response() {
    let app = app();
    let response = send(
        &app,
        request(Method::GET, "/healthz", "203.0.113.5:4000")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["referrer-policy"], "no-referrer");
    assert!(headers.contains_key("content-security-policy"));
    assert!(headers.contains_key("x-request-id"));
    assert!(!headers.contains_key("strict-transport-security"));

    let response = send(
        &app,
        request(Method::GET, "/healthz", "203.0.113.5:4000")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert!(response.headers().contains_key("strict-transport-security"));
}

#[tokio::test]
async fn rejected_requests_still_get_security_headers() {
    let app = app();
    let response = send(&app, vote_from("203.0.113.5:4000", None, None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}

#[tokio::test]
async fn health_reflects_ledger() {
    let app = app();
    let get = || request(Method::GET, "/healthz", "203.0.113.5:4000").body(Body::empty()).unwrap();

    let response = send(&app, get()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["database"], "ok");

    app.ledger.fail(FailPoint::Ping);
    let response = send(&app, get()).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn metrics_endpoint_exposes_counters() {
    let app = app();
    send(&app, vote_from("203.0.113.5:4000", Some(TOKEN), Some(TOKEN))).await;
    let response = send(
        &app,
        request(Method::GET, "/metrics", "203.0.113.5:4000")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("voteweb_votes_accepted_total 1"));
}

// ── Admin ───────────────────────────────────────────────────────────────

fn admin_app() -> TestApp {
    app_with(GatewayConfig {
        admin_code: Some(" s3cret ".to_string()),
        ..GatewayConfig::default()
    })
}

fn admin_request(code: Option<&str>) -> Request<Body> {
    let mut builder = request(Method::GET, "/admin/api/data", "203.0.113.5:4000");
    if let Some(code) = code {
        builder = builder.header("X-ADMIN-CODE", code);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn admin_routes_absent_without_code() {
    let app = app();
    let response = send(&app, admin_request(Some("anything"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_requires_matching_code() {
    let app = admin_app();
    assert_eq!(send(&app, admin_request(None)).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(send(&app, admin_request(Some("wrong"))).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(send(&app, admin_request(Some("s3cret"))).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_data_reports_relative_percentages() {
    let app = admin_app();
    send(&app, vote_from("203.0.113.5:4000", Some(TOKEN), Some(TOKEN))).await;
    send(&app, vote_from("203.0.113.6:4000", Some(TOKEN), Some(TOKEN))).await;

    let body = json(send(&app, admin_request(Some("s3cret"))).await).await;
    assert_eq!(body["total_innovations"], 2);
    assert_eq!(body["total_votes"], 2);
    assert_eq!(body["total_voters"], 2);
    assert_eq!(body["max_votes"], 2);
    assert_eq!(body["innovations"][0]["vote_percentage"], 100.0);
    assert_eq!(body["innovations"][1]["vote_percentage"], 0.0);
}

#[tokio::test]
async fn admin_counts_degrade_to_zero() {
    let app = admin_app();
    app.ledger.fail(FailPoint::VoteCount);
    app.ledger.fail(FailPoint::TotalVoters);
    let response = send(&app, admin_request(Some("s3cret"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["total_votes"], 0);
    assert_eq!(body["total_voters"], 0);
}
