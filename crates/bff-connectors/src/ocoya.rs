use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConnectorError;
use crate::types::{PublishPost, RelayOutcome};

/// Ocoya connector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcoyaConfig {
    /// API key; when unset the connector runs in skip mode.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_ocoya_base_url")]
    pub base_url: String,

    #[serde(default = "default_ocoya_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_ocoya_base_url() -> String {
    "https://api.ocoya.com".into()
}

fn default_ocoya_timeout_secs() -> u64 {
    30
}

impl Default for OcoyaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_ocoya_base_url(),
            timeout_secs: default_ocoya_timeout_secs(),
        }
    }
}

/// Client for the Ocoya content scheduling API.
pub struct OcoyaClient {
    http_client: Client,
    config: OcoyaConfig,
}

impl OcoyaClient {
    pub fn new(config: OcoyaConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }

    /// Schedule a social post.
    ///
    /// Without an API key this returns a skipped outcome echoing the post.
    pub async fn schedule_post(&self, post: &PublishPost) -> Result<RelayOutcome, ConnectorError> {
        let Some(api_key) = self.config.api_key.as_ref() else {
            debug!(channel = %post.channel, "Ocoya api_key not set, skipping relay");
            return Ok(RelayOutcome::skipped(
                "ocoya api_key not configured",
                serde_json::to_value(post)?,
            ));
        };

        let url = format!("{}/v1/schedule", self.config.base_url.trim_end_matches('/'));

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(post)
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .send()
            .await
            .map_err(|e| ConnectorError::from_reqwest(e, self.config.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ConnectorError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ConnectorError::SendFailed(e.to_string()))?;

        let external_id = body
            .get("id")
            .and_then(|id| match id {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            });

        info!(
            channel = %post.channel,
            external_id = ?external_id,
            "Ocoya post scheduled"
        );

        Ok(RelayOutcome::delivered(external_id, Some(body)))
    }
}
