use axum::extract::State;
use axum::response::IntoResponse;
use axum::{
    Json,
    body::Body,
    http::{HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::errors::error_body;
use crate::server::AppState;

// =============================================================================
// Shared-secret Middleware
// =============================================================================

/// Header carrying the shared secret.
pub const BFF_KEY_HEADER: &str = "x-bff-key";

/// Shared-secret middleware gating all mutating routes.
///
/// This middleware:
/// 1. Passes everything through when enforcement is disabled
/// 2. Skips public endpoints (health and banner routes)
/// 3. Requires `x-bff-key` to match the configured secret otherwise
///
/// A missing or mismatched key returns 401 with the error envelope.
pub async fn require_key(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.auth.enabled {
        return next.run(req).await;
    }

    // Skip enforcement for public endpoints
    if is_public_path(req.uri().path()) {
        return next.run(req).await;
    }

    let authorized = req
        .headers()
        .get(BFF_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|key| keys_match(key, &state.config.auth.key))
        .unwrap_or(false);

    if authorized {
        return next.run(req).await;
    }

    tracing::debug!(path = %req.uri().path(), "Rejected request without a valid key");
    unauthorized_response("Missing or invalid x-bff-key header")
}

/// Check if a request path is public (no shared secret required).
fn is_public_path(path: &str) -> bool {
    let public_paths = ["/", "/health", "/healthz", "/readyz", "/favicon.ico"];
    public_paths.contains(&path)
}

/// Constant-time comparison over the key bytes. Length still leaks.
fn keys_match(provided: &str, expected: &str) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Create an unauthorized (401) response with the error envelope.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(error_body("unauthorized", message)),
    )
        .into_response()
}

// =============================================================================
// Other Middleware
// =============================================================================

// Middleware that ensures each request has an X-Request-Id and mirrors it on the response
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static("x-request-id");

    // If the incoming request already has a request-id, preserve it; otherwise generate one
    let req_id_value = req
        .headers()
        .get(&header_name)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap());

    // Add to request extensions for downstream usage (e.g., logging)
    req.extensions_mut().insert(req_id_value.clone());

    let mut res = next.run(req).await;

    // Add/propagate the request id header to response
    res.headers_mut().insert(header_name, req_id_value);

    res
}
