//! Gateway error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use voteweb_admission::AdmissionError;
use voteweb_types::InputError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("innovation not found")]
    InnovationNotFound,

    #[error("invalid request: {0}")]
    InvalidInput(#[from] InputError),

    #[error("voting is closed")]
    VotingClosed,

    #[error("CSRF token missing")]
    CsrfCookieMissing,

    #[error("CSRF token missing in header")]
    CsrfHeaderMissing,

    #[error("CSRF token mismatch")]
    CsrfMismatch,

    #[error("X-ADMIN-CODE header is required")]
    AdminCodeMissing,

    #[error("Invalid admin code")]
    AdminCodeInvalid,

    #[error("request deadline expired")]
    Timeout,

    #[error("{context}: {source}")]
    Admission {
        context: &'static str,
        #[source]
        source: AdmissionError,
    },
}

impl GatewayError {
    /// Wrap an engine error, keeping deadline expiry distinguishable.
    pub fn admission(context: &'static str) -> impl FnOnce(AdmissionError) -> Self {
        move |source| match source {
            AdmissionError::Timeout => GatewayError::Timeout,
            AdmissionError::InvalidInput(e) => GatewayError::InvalidInput(e),
            source => GatewayError::Admission { context, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InnovationNotFound => StatusCode::NOT_FOUND,
            GatewayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GatewayError::VotingClosed
            | GatewayError::CsrfCookieMissing
            | GatewayError::CsrfHeaderMissing
            | GatewayError::CsrfMismatch
            | GatewayError::AdminCodeInvalid => StatusCode::FORBIDDEN,
            GatewayError::AdminCodeMissing => StatusCode::UNAUTHORIZED,
            GatewayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Admission { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            GatewayError::InnovationNotFound => json!({ "error": "innovation_not_found" }),
            GatewayError::InvalidInput(e) => {
                json!({ "error": "invalid_request", "message": e.to_string() })
            }
            GatewayError::VotingClosed => json!({
                "error": "voting_closed",
                "message": "Voting sudah ditutup",
            }),
            GatewayError::Timeout => json!({ "error": "timeout" }),
            GatewayError::Admission { context, source } => {
                // Logged once here; the caller only sees the context.
                tracing::error!(error = %source, "{}", context);
                json!({ "error": context })
            }
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
