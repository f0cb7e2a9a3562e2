use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::error::ConnectorError;
use crate::types::{EmailMessage, RelayOutcome};

/// Email relay configuration.
///
/// Two delivery modes, chosen by which credentials are present:
/// - `api_key` set: HTTP API relay (SendGrid-compatible mail/send endpoint)
/// - `smtp_host` set: SMTP via lettre, with optional credentials
///
/// Neither set: skip mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_email_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub smtp_host: Option<String>,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: Option<String>,

    #[serde(default)]
    pub smtp_password: Option<String>,

    /// Sender address for all outbound mail, including the daily report.
    #[serde(default = "default_email_from")]
    pub from: String,

    #[serde(default = "default_email_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_email_api_url() -> String {
    "https://api.sendgrid.com/v3/mail/send".into()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_email_from() -> String {
    "reports@bffaitrainer.com".into()
}

fn default_email_timeout_secs() -> u64 {
    30
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_email_api_url(),
            smtp_host: None,
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            from: default_email_from(),
            timeout_secs: default_email_timeout_secs(),
        }
    }
}

/// Outbound email relay.
pub struct EmailRelay {
    http_client: Client,
    config: EmailConfig,
}

impl EmailRelay {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }

    /// Sender address used for outbound mail.
    pub fn from_address(&self) -> &str {
        &self.config.from
    }

    /// Send an HTML email, picking the provider by available config.
    pub async fn send(&self, message: &EmailMessage) -> Result<RelayOutcome, ConnectorError> {
        if self.config.api_key.is_some() {
            self.send_api(message).await
        } else if self.config.smtp_host.is_some() {
            self.send_smtp(message).await
        } else {
            debug!(to = %message.to, "No email provider configured, skipping relay");
            Ok(RelayOutcome::skipped(
                "email relay not configured",
                serde_json::to_value(message)?,
            ))
        }
    }

    async fn send_api(&self, message: &EmailMessage) -> Result<RelayOutcome, ConnectorError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(ConnectorError::InvalidConfig("Missing api_key".into()))?;

        let body = json!({
            "personalizations": [{
                "to": [{"email": message.to}]
            }],
            "from": {"email": self.config.from},
            "subject": message.subject,
            "content": [{
                "type": "text/html",
                "value": message.html
            }]
        });

        let response = self
            .http_client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&body)
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

        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        info!(to = %message.to, message_id = ?message_id, "Email relayed via API");

        Ok(RelayOutcome::delivered(message_id, None))
    }

    async fn send_smtp(&self, message: &EmailMessage) -> Result<RelayOutcome, ConnectorError> {
        let host = self
            .config
            .smtp_host
            .as_ref()
            .ok_or(ConnectorError::InvalidConfig("Missing smtp_host".into()))?;

        let email = Message::builder()
            .from(self.config.from.parse().map_err(|e| {
                ConnectorError::InvalidConfig(format!("Invalid from address: {e}"))
            })?)
            .to(message.to.parse().map_err(|e| {
                ConnectorError::InvalidConfig(format!("Invalid to address: {e}"))
            })?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
            .map_err(|e| ConnectorError::SendFailed(e.to_string()))?;

        let mut mailer_builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| ConnectorError::InvalidConfig(e.to_string()))?
            .port(self.config.smtp_port);

        if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer_builder =
                mailer_builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let mailer = mailer_builder.build();

        let response = mailer
            .send(email)
            .await
            .map_err(|e| ConnectorError::SendFailed(e.to_string()))?;

        let external_id: String = response.message().map(|m| m.to_string()).collect();

        info!(to = %message.to, "Email relayed via SMTP");

        Ok(RelayOutcome::delivered(
            (!external_id.is_empty()).then_some(external_id),
            None,
        ))
    }
}
