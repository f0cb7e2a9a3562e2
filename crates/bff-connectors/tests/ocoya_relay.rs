use bff_connectors::{ConnectorError, OcoyaClient, OcoyaConfig, RelayStatus};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn post(channel: &str) -> bff_connectors::PublishPost {
    serde_json::from_value(json!({
        "channel": channel,
        "text": "New drop is live",
        "tags": ["launch"],
        "schedule_iso": "2025-06-01T07:45:00Z"
    }))
    .expect("valid post")
}

#[tokio::test]
async fn schedules_post_with_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/schedule"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "channel": "linkedin",
            "text": "New drop is live"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "post_1",
            "status": "scheduled"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OcoyaClient::new(OcoyaConfig {
        api_key: Some("test-key".into()),
        base_url: server.uri(),
        ..OcoyaConfig::default()
    });

    let outcome = client.schedule_post(&post("linkedin")).await.expect("relay");
    assert_eq!(outcome.status, RelayStatus::Delivered);
    assert_eq!(outcome.external_id.as_deref(), Some("post_1"));
    assert_eq!(outcome.upstream.unwrap()["status"], "scheduled");
}

#[tokio::test]
async fn skips_without_api_key_and_echoes_payload() {
    let client = OcoyaClient::new(OcoyaConfig::default());

    let outcome = client.schedule_post(&post("tiktok")).await.expect("relay");
    assert_eq!(outcome.status, RelayStatus::Skipped);
    assert_eq!(
        outcome.reason.as_deref(),
        Some("ocoya api_key not configured")
    );
    assert_eq!(outcome.echo.unwrap()["channel"], "tiktok");
}

#[tokio::test]
async fn upstream_failure_maps_to_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/schedule"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = OcoyaClient::new(OcoyaConfig {
        api_key: Some("test-key".into()),
        base_url: server.uri(),
        ..OcoyaConfig::default()
    });

    let err = client.schedule_post(&post("facebook")).await.unwrap_err();
    match err {
        ConnectorError::Upstream { status, detail } => {
            assert_eq!(status, 503);
            assert_eq!(detail, "maintenance");
        }
        other => panic!("expected Upstream error, got {other:?}"),
    }
}
