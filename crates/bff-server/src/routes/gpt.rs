//! GPT employee endpoints: one route, dispatching on the persona slug.
//!
//! Every persona acknowledges the task by echoing it under its display name.
//! A few personas additionally trigger an outbound relay based on well-known
//! keys in `task.data`; the relay outcome rides along on the reply.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use bff_connectors::{PublishPost, RelayOutcome, SystemeContact};
use bff_core::{AgentId, TaskPayload};

use crate::errors::ApiError;
use crate::server::AppState;

/// Tag applied to contacts created from LEADAI tasks.
const LEAD_TAG: &str = "lead_generated";

#[derive(Debug, Serialize)]
pub struct AgentReply {
    pub agent: &'static str,

    pub received: TaskPayload,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub relay: Option<RelayOutcome>,
}

impl AgentReply {
    fn new(agent: AgentId, task: TaskPayload) -> Self {
        Self {
            agent: agent.display_name(),
            received: task,
            next: None,
            hint: None,
            relay: None,
        }
    }
}

/// POST /gpt/{agent}
pub async fn dispatch(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(task): Json<TaskPayload>,
) -> Result<Json<AgentReply>, ApiError> {
    let agent: AgentId = slug.parse()?;

    tracing::debug!(agent = %agent, intent = %task.intent, "Dispatching agent task");

    let mut reply = AgentReply::new(agent, task);

    match agent {
        AgentId::Cris => {
            reply.next = Some("route to appropriate agent based on task.intent");
        }
        AgentId::RevenueAi => {
            reply.hint = Some("includes stock-window content cadence & KPI rollups");
        }
        AgentId::LeadAi => {
            let lead_email = reply
                .received
                .data_value("lead")
                .and_then(|lead| lead.get("email"))
                .and_then(|email| email.as_str())
                .map(str::to_owned);

            if let Some(email) = lead_email {
                let contact = SystemeContact::from_lead(email, vec![LEAD_TAG.into()]);
                reply.relay = Some(state.systeme.upsert_contact(&contact).await?);
            }
        }
        AgentId::ConvertAi => {
            let post_value = reply.received.data_value("post").cloned();

            if let Some(value) = post_value {
                let post: PublishPost = serde_json::from_value(value)
                    .map_err(|e| ApiError::InvalidPayload(format!("data.post: {e}")))?;
                reply.relay = Some(state.ocoya.schedule_post(&post).await?);
            }
        }
        _ => {}
    }

    Ok(Json(reply))
}
