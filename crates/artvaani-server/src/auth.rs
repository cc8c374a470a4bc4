//! Bearer token authentication for the flow routes
//!
//! The expected key lives in [`AppState`]; when it is absent every request
//! passes through.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Extract the token from an `Authorization: Bearer <token>` header value
fn bearer_token(value: &str) -> Option<&str> {
    value.strip_prefix("Bearer ").map(str::trim)
}

/// Reject requests whose bearer token does not match the configured key
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let expected = match state.api_key.as_deref() {
        Some(key) if !key.is_empty() => key,
        _ => return Ok(next.run(request).await),
    };

    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token);

    match presented {
        Some(token) if token == expected => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!(path = %request.uri().path(), "Rejected request with wrong API key");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            tracing::warn!(path = %request.uri().path(), "Missing or malformed Authorization header");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
