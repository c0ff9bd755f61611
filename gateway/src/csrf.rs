//! Double-submit cookie CSRF guard.
//!
//! Safe requests get a `csrf_token` cookie if they lack one. Unsafe requests
//! must carry the same value in both the cookie and the `X-CSRF-Token`
//! header, or they are rejected before reaching any handler.

use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};
use voteweb_crypto::{constant_time_eq, generate_csrf_token};

use crate::{AppState, GatewayError};

pub const CSRF_COOKIE_NAME: &str = "csrf_token";
pub const CSRF_HEADER_NAME: &str = "x-csrf-token";
const CSRF_COOKIE_MAX_AGE_SECS: u32 = 3600;

/// The CSRF token in effect for this request, for handlers that hand it to
/// the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfToken(pub String);

/// Find `name` in a `Cookie` header value (`a=1; b=2`).
pub fn parse_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}

fn request_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|header| parse_cookie(header, name))
}

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

fn set_cookie_header(token: &str, secure: bool) -> Option<HeaderValue> {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        CSRF_COOKIE_NAME, token, CSRF_COOKIE_MAX_AGE_SECS
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

fn verify(headers: &HeaderMap) -> Result<(), GatewayError> {
    let cookie = request_cookie(headers, CSRF_COOKIE_NAME).ok_or(GatewayError::CsrfCookieMissing)?;
    let header = headers
        .get(CSRF_HEADER_NAME)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(GatewayError::CsrfHeaderMissing)?;
    if !constant_time_eq(cookie.as_bytes(), header.as_bytes()) {
        return Err(GatewayError::CsrfMismatch);
    }
    Ok(())
}

pub async fn csrf_guard(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if !is_safe(request.method()) {
        if let Err(e) = verify(request.headers()) {
            warn!(path = %request.uri().path(), reason = %e, "CSRF check failed");
            state.metrics.csrf_rejections.inc();
            return e.into_response();
        }
        return next.run(request).await;
    }

    if let Some(existing) = request_cookie(request.headers(), CSRF_COOKIE_NAME) {
        let token = CsrfToken(existing.to_string());
        request.extensions_mut().insert(token);
        return next.run(request).await;
    }

    let token = generate_csrf_token();
    request.extensions_mut().insert(CsrfToken(token.clone()));
    let mut response = next.run(request).await;
    match set_cookie_header(&token, state.config.secure_cookies) {
        Some(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        None => debug!("generated CSRF token is not a valid header value"),
    }
    response
}
