//! Public route handlers.

use std::time::{Duration, Instant};

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_TYPE, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};
use voteweb_admission::{Decision, VoteRequest};
use voteweb_types::Innovation;

use crate::presentation::{hero_image, is_bot};
use crate::{AppState, ClientIdentity, CsrfToken, GatewayError};

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

fn user_agent(headers: &HeaderMap) -> Option<&str> {
    headers.get(USER_AGENT).and_then(|v| v.to_str().ok())
}

// ── Health and metrics ──────────────────────────────────────────────────

pub async fn healthz(State(state): State<AppState>) -> Response {
    let ping = tokio::time::timeout(HEALTH_CHECK_TIMEOUT, state.engine.ledger().ping()).await;
    match ping {
        Ok(Ok(())) => Json(json!({ "status": "ok", "database": "ok" })).into_response(),
        Ok(Err(e)) => {
            error!(error = %e, "health check: ledger ping failed");
            unhealthy()
        }
        Err(_) => {
            error!("health check: ledger ping timed out");
            unhealthy()
        }
    }
}

fn unhealthy() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "status": "error", "database": "error" })),
    )
        .into_response()
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.encode(),
    )
}

// ── Listing and detail ──────────────────────────────────────────────────

#[derive(Serialize)]
struct InnovationView<'a> {
    #[serde(flatten)]
    innovation: &'a Innovation,
    vote_count: i64,
}

#[derive(Serialize)]
struct GroupView<'a> {
    group_slug: &'a str,
    innovations: Vec<InnovationView<'a>>,
}

async fn vote_count_or_zero(state: &AppState, innovation: &Innovation) -> i64 {
    match state.engine.get_vote_count(&innovation.id).await {
        Ok(count) => count,
        Err(e) => {
            error!(innovation = %innovation.id, error = %e, "failed to get vote count");
            0
        }
    }
}

pub async fn list_innovations(State(state): State<AppState>) -> Result<Response, GatewayError> {
    let innovations = state
        .engine
        .list_innovations()
        .await
        .map_err(GatewayError::admission("Failed to load innovations"))?;

    let mut groups: Vec<GroupView<'_>> = Vec::new();
    for innovation in &innovations {
        let view = InnovationView {
            innovation,
            vote_count: vote_count_or_zero(&state, innovation).await,
        };
        match groups.last_mut() {
            Some(group) if group.group_slug == innovation.group_slug => group.innovations.push(view),
            _ => groups.push(GroupView {
                group_slug: &innovation.group_slug,
                innovations: vec![view],
            }),
        }
    }

    Ok(Json(json!({ "total": innovations.len(), "groups": groups })).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    pub preview: Option<String>,
}

pub async fn innovation_detail(
    State(state): State<AppState>,
    Path((group, slug)): Path<(String, String)>,
    Query(query): Query<DetailQuery>,
    Extension(identity): Extension<ClientIdentity>,
    csrf: Option<Extension<CsrfToken>>,
    headers: HeaderMap,
) -> Result<Response, GatewayError> {
    let innovation = state
        .engine
        .get_innovation(&group, &slug)
        .await
        .map_err(GatewayError::admission("Failed to load innovation"))?
        .ok_or(GatewayError::InnovationNotFound)?;

    let mut vote_count = vote_count_or_zero(&state, &innovation).await;

    let mut has_voted = false;
    if identity.is_known() {
        match state
            .engine
            .check_has_voted(&innovation.id, identity.as_str())
            .await
        {
            Ok(voted) => has_voted = voted,
            Err(e) => error!(innovation = %innovation.id, error = %e, "failed to check vote status"),
        }
    }

    let ua = user_agent(&headers).unwrap_or_default();
    let preview = query.preview.as_deref() == Some("1");
    if state.config.auto_vote_on_view && !has_voted && identity.is_known() && !is_bot(ua) && !preview {
        let request = VoteRequest::new(&group, &slug, identity.as_str(), Some(ua));
        let decision = state.engine.submit_vote(&request).await;
        state.metrics.record_decision(&decision);
        match decision {
            Decision::Accepted {
                vote_count: count, ..
            } => {
                vote_count = count;
                has_voted = true;
            }
            Decision::AlreadyVoted { .. } => has_voted = true,
            other => warn!(group = %group, slug = %slug, outcome = other.kind(), "auto-vote failed"),
        }
    }

    let csrf_token = csrf.map(|Extension(token)| token.0).unwrap_or_default();
    Ok(Json(json!({
        "innovation": innovation,
        "vote_count": vote_count,
        "has_voted": has_voted,
        "csrf_token": csrf_token,
        "hero_image": hero_image(&group, &slug),
    }))
    .into_response())
}

// ── Submission ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct VoteAccepted<'a> {
    success: bool,
    message: &'a str,
    vote_count: i64,
}

#[derive(Serialize)]
struct VoteRejected<'a> {
    error: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    vote_count: Option<i64>,
}

pub async fn submit_vote(
    State(state): State<AppState>,
    Path((group, slug)): Path<(String, String)>,
    Extension(identity): Extension<ClientIdentity>,
    headers: HeaderMap,
) -> Response {
    if !state.config.voting_open {
        return GatewayError::VotingClosed.into_response();
    }

    let request = VoteRequest::new(&group, &slug, identity.as_str(), user_agent(&headers));
    let started = Instant::now();
    let decision = state.engine.submit_vote(&request).await;
    state
        .metrics
        .admission_latency_ms
        .observe(started.elapsed().as_secs_f64() * 1000.0);
    state.metrics.record_decision(&decision);

    decision_response(decision)
}

fn decision_response(decision: Decision) -> Response {
    match decision {
        Decision::Accepted {
            vote_count,
            message,
        } => Json(VoteAccepted {
            success: true,
            message: &message,
            vote_count,
        })
        .into_response(),
        Decision::AlreadyVoted {
            message,
            vote_count,
            ..
        } => (
            StatusCode::CONFLICT,
            Json(VoteRejected {
                error: "already_voted",
                message: &message,
                vote_count,
            }),
        )
            .into_response(),
        Decision::NotFound => GatewayError::InnovationNotFound.into_response(),
        Decision::Invalid(e) => GatewayError::InvalidInput(e).into_response(),
        Decision::InternalFailure(e) => {
            GatewayError::admission("Failed to submit vote")(e).into_response()
        }
    }
}
