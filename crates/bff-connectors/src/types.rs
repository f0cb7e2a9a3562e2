use std::collections::HashMap;

use bff_core::Rfc3339Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Delivery status of an outbound relay call.
///
/// `Skipped` is not a failure: a connector without a configured credential
/// acknowledges the request and echoes the payload back, so the calling
/// agent flow keeps working before the real API wiring is in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayStatus {
    Delivered,
    Skipped,
}

/// Result of an outbound relay call, passed through to HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayOutcome {
    pub status: RelayStatus,

    /// Identifier assigned by the upstream service, when one was returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Why the call was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// The payload as received, echoed back on skipped calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<Value>,

    /// Raw upstream response body, when delivery produced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<Value>,

    /// Non-fatal problems encountered during delivery (e.g. a tag that
    /// could not be applied).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl RelayOutcome {
    pub fn delivered(external_id: Option<String>, upstream: Option<Value>) -> Self {
        Self {
            status: RelayStatus::Delivered,
            external_id,
            reason: None,
            echo: None,
            upstream,
            warnings: Vec::new(),
        }
    }

    pub fn skipped(reason: impl Into<String>, echo: Value) -> Self {
        Self {
            status: RelayStatus::Skipped,
            external_id: None,
            reason: Some(reason.into()),
            echo: Some(echo),
            upstream: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn is_delivered(&self) -> bool {
        self.status == RelayStatus::Delivered
    }
}

/// A social post to schedule through Ocoya.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishPost {
    /// Ocoya channel key or account id (e.g. linkedin, facebook, instagram,
    /// youtube, tiktok).
    pub channel: String,

    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<Url>,

    /// Publication time; omitted means "post now".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_iso: Option<Rfc3339Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm: Option<HashMap<String, String>>,
}

/// A CRM contact to upsert into Systeme.io.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemeContact {
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
}

impl SystemeContact {
    /// Minimal contact carrying only an email and a set of tags, as created
    /// by the LEADAI persona.
    pub fn from_lead(email: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            email: email.into(),
            first_name: None,
            last_name: None,
            tags,
            campaign_id: None,
        }
    }
}

/// An outbound email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}
