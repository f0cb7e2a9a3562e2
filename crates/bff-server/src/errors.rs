use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use bff_connectors::ConnectorError;
use bff_core::CoreError;

/// Errors surfaced on the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing or invalid x-bff-key header")]
    Unauthorized,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Connector(#[from] ConnectorError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Self::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "invalid-payload"),
            Self::Connector(ConnectorError::Upstream { .. }) => {
                (StatusCode::BAD_GATEWAY, "upstream-error")
            }
            Self::Connector(ConnectorError::Timeout(_)) => {
                (StatusCode::GATEWAY_TIMEOUT, "upstream-timeout")
            }
            Self::Connector(_) => (StatusCode::BAD_GATEWAY, "relay-failed"),
            Self::Core(CoreError::UnknownAgent(_)) => (StatusCode::NOT_FOUND, "unknown-agent"),
            Self::Core(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, "invalid-payload"),
            Self::Core(_) | Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "Request failed");
        } else {
            tracing::debug!(code, error = %self, "Request rejected");
        }
        (status, Json(error_body(code, &self.to_string()))).into_response()
    }
}

/// Uniform error envelope for all locally-generated errors.
pub fn error_body(code: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Unauthorized.status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidPayload("bad".into()).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Core(CoreError::unknown_agent("x")).status_and_code(),
            (StatusCode::NOT_FOUND, "unknown-agent")
        );
        assert_eq!(
            ApiError::Connector(ConnectorError::Upstream {
                status: 503,
                detail: "down".into()
            })
            .status_and_code()
            .0,
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Connector(ConnectorError::Timeout(30)).status_and_code().0,
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_and_code().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_shape() {
        let body = error_body("unauthorized", "Missing or invalid x-bff-key header");
        assert_eq!(body["error"]["code"], "unauthorized");
        assert_eq!(body["error"]["message"], "Missing or invalid x-bff-key header");
    }
}
