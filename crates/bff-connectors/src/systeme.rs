use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::ConnectorError;
use crate::types::{RelayOutcome, SystemeContact};

/// Systeme.io connector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemeConfig {
    /// Public API key; when unset the connector runs in skip mode.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_systeme_base_url")]
    pub base_url: String,

    #[serde(default = "default_systeme_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_systeme_base_url() -> String {
    "https://api.systeme.io".into()
}

fn default_systeme_timeout_secs() -> u64 {
    30
}

impl Default for SystemeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_systeme_base_url(),
            timeout_secs: default_systeme_timeout_secs(),
        }
    }
}

/// Client for the Systeme.io public API.
pub struct SystemeClient {
    http_client: Client,
    config: SystemeConfig,
}

impl SystemeClient {
    pub fn new(config: SystemeConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }

    /// Upsert a contact, then apply its tags one by one.
    ///
    /// A tag that fails to apply does not fail the upsert; it is logged and
    /// surfaced as a warning on the outcome.
    pub async fn upsert_contact(
        &self,
        contact: &SystemeContact,
    ) -> Result<RelayOutcome, ConnectorError> {
        let Some(api_key) = self.config.api_key.as_ref() else {
            debug!(email = %contact.email, "Systeme api_key not set, skipping relay");
            return Ok(RelayOutcome::skipped(
                "systeme api_key not configured",
                serde_json::to_value(contact)?,
            ));
        };

        let base = self.config.base_url.trim_end_matches('/');
        let timeout = std::time::Duration::from_secs(self.config.timeout_secs);

        let response = self
            .http_client
            .post(format!("{base}/api/contacts"))
            .header("X-API-Key", api_key)
            .json(&json!({
                "email": contact.email,
                "firstName": contact.first_name,
                "lastName": contact.last_name,
            }))
            .timeout(timeout)
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

        let contact_id = body.get("id").and_then(|id| match id {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        let mut warnings = Vec::new();
        if let Some(ref id) = contact_id {
            for tag in &contact.tags {
                if let Err(e) = self.apply_tag(api_key, id, tag, timeout).await {
                    warn!(email = %contact.email, tag = %tag, error = %e, "Failed to apply tag");
                    warnings.push(format!("tag '{tag}' not applied: {e}"));
                }
            }
        } else if !contact.tags.is_empty() {
            warn!(email = %contact.email, "Contact response carried no id, tags not applied");
            warnings.push("contact response carried no id, tags not applied".into());
        }

        info!(
            email = %contact.email,
            contact_id = ?contact_id,
            tags = contact.tags.len(),
            "Systeme contact upserted"
        );

        Ok(RelayOutcome::delivered(contact_id, Some(body)).with_warnings(warnings))
    }

    async fn apply_tag(
        &self,
        api_key: &str,
        contact_id: &str,
        tag: &str,
        timeout: std::time::Duration,
    ) -> Result<(), ConnectorError> {
        let base = self.config.base_url.trim_end_matches('/');

        let response = self
            .http_client
            .post(format!("{base}/api/contacts/{contact_id}/tags"))
            .header("X-API-Key", api_key)
            .json(&json!({ "tagName": tag }))
            .timeout(timeout)
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

        Ok(())
    }
}
