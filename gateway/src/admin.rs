//! Admin analytics, gated by a shared secret header.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::error;
use voteweb_crypto::constant_time_eq;
use voteweb_types::Innovation;

use crate::{AppState, GatewayError};

pub const ADMIN_CODE_HEADER: &str = "x-admin-code";

/// Reject requests whose `X-ADMIN-CODE` does not match the configured code.
/// Both sides are trimmed before comparison.
pub async fn require_admin_code(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let expected = state
        .config
        .admin_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or(GatewayError::AdminCodeInvalid)?;

    let provided = request
        .headers()
        .get(ADMIN_CODE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or(GatewayError::AdminCodeMissing)?;

    if !constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        return Err(GatewayError::AdminCodeInvalid);
    }
    Ok(next.run(request).await)
}

#[derive(Serialize)]
struct InnovationStats<'a> {
    #[serde(flatten)]
    innovation: &'a Innovation,
    vote_count: i64,
    vote_percentage: f64,
}

/// Percentage of `count` relative to the leader.
fn percentage_of_max(count: i64, max: i64) -> f64 {
    if max > 0 {
        count as f64 / max as f64 * 100.0
    } else {
        0.0
    }
}

pub async fn analytics_data(State(state): State<AppState>) -> Result<Response, GatewayError> {
    let innovations = state
        .engine
        .list_innovations()
        .await
        .map_err(GatewayError::admission("Failed to load analytics data"))?;

    let mut counts = Vec::with_capacity(innovations.len());
    for innovation in &innovations {
        let count = match state.engine.get_vote_count(&innovation.id).await {
            Ok(count) => count,
            Err(e) => {
                error!(innovation = %innovation.id, error = %e, "failed to get vote count");
                0
            }
        };
        counts.push(count);
    }

    let total_votes: i64 = counts.iter().sum();
    let max_votes = counts.iter().copied().max().unwrap_or(0);
    let total_voters = state.engine.get_total_voters().await.unwrap_or_else(|e| {
        error!(error = %e, "failed to get total voters");
        0
    });

    let stats: Vec<_> = innovations
        .iter()
        .zip(&counts)
        .map(|(innovation, &vote_count)| InnovationStats {
            innovation,
            vote_count,
            vote_percentage: percentage_of_max(vote_count, max_votes),
        })
        .collect();

    Ok(Json(json!({
        "total_innovations": innovations.len(),
        "total_votes": total_votes,
        "total_voters": total_voters,
        "max_votes": max_votes,
        "innovations": stats,
    }))
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_are_relative_to_leader() {
        assert_eq!(percentage_of_max(5, 10), 50.0);
        assert_eq!(percentage_of_max(10, 10), 100.0);
        assert_eq!(percentage_of_max(0, 0), 0.0);
    }
}
