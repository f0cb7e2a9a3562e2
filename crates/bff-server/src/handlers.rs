use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::json;

/// Service name reported on banner and health endpoints.
pub const SERVICE_NAME: &str = "BFF Middleware v24";

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": SERVICE_NAME,
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

/// Health endpoint kept in the shape the GPT agents already poll.
pub async fn health() -> impl IntoResponse {
    let body = json!({
        "ok": true,
        "service": SERVICE_NAME,
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz() -> impl IntoResponse {
    // Connectors are created lazily and hold no connections to probe
    (StatusCode::OK, Json(HealthResponse { status: "ready" }))
}

pub async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
