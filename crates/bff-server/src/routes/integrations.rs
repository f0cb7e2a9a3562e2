//! Relay endpoints: validate the payload, forward it through the matching
//! connector, and pass the outcome back to the caller.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use bff_connectors::{EmailMessage, PublishPost, RelayOutcome, SystemeContact};

use crate::errors::ApiError;
use crate::report;
use crate::server::AppState;

/// POST /social/publish-ocoya
pub async fn publish_ocoya(
    State(state): State<AppState>,
    Json(post): Json<PublishPost>,
) -> Result<Json<RelayOutcome>, ApiError> {
    let outcome = state.ocoya.schedule_post(&post).await?;
    Ok(Json(outcome))
}

/// POST /systeme/contact
pub async fn systeme_contact(
    State(state): State<AppState>,
    Json(contact): Json<SystemeContact>,
) -> Result<Json<RelayOutcome>, ApiError> {
    let outcome = state.systeme.upsert_contact(&contact).await?;
    Ok(Json(outcome))
}

/// POST /gmail/send
pub async fn gmail_send(
    State(state): State<AppState>,
    Json(message): Json<EmailMessage>,
) -> Result<Json<RelayOutcome>, ApiError> {
    let outcome = state.email.send(&message).await?;
    Ok(Json(outcome))
}

/// POST /cron/daily-bff-report
///
/// Composes the report, emails it to the configured recipient, and returns
/// both the report and the delivery outcome. An unconfigured email relay
/// yields a skipped delivery, not an error.
pub async fn daily_report(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let report = report::compose();
    let delivery = report::deliver(&state.email, &state.config.report.recipient, &report).await?;

    tracing::info!(
        recipient = %state.config.report.recipient,
        delivery = ?delivery.status,
        "Daily report produced"
    );

    Ok(Json(json!({
        "status": "ok",
        "delivery": delivery,
        "report": report,
    })))
}
