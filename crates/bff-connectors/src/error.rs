use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Upstream rejected request ({status}): {detail}")]
    Upstream { status: u16, detail: String },

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConnectorError {
    /// Classify a reqwest transport error the way the proxy path does:
    /// timeouts and connect failures get their own variants, everything else
    /// is a generic send failure.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else if err.is_connect() {
            Self::SendFailed(format!("Failed to connect to target: {err}"))
        } else {
            Self::SendFailed(err.to_string())
        }
    }
}
