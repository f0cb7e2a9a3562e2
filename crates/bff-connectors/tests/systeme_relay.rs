use bff_connectors::{ConnectorError, RelayStatus, SystemeClient, SystemeConfig, SystemeContact};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn upserts_contact_then_applies_each_tag() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/contacts"))
        .and(header("x-api-key", "sk-test"))
        .and(body_partial_json(json!({ "email": "lead@example.com" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 42,
            "email": "lead@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/contacts/42/tags"))
        .and(header("x-api-key", "sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(2)
        .mount(&server)
        .await;

    let client = SystemeClient::new(SystemeConfig {
        api_key: Some("sk-test".into()),
        base_url: server.uri(),
        ..SystemeConfig::default()
    });

    let contact = SystemeContact {
        email: "lead@example.com".into(),
        first_name: Some("Lee".into()),
        last_name: None,
        tags: vec!["lead_generated".into(), "newsletter".into()],
        campaign_id: None,
    };

    let outcome = client.upsert_contact(&contact).await.expect("relay");
    assert_eq!(outcome.status, RelayStatus::Delivered);
    assert_eq!(outcome.external_id.as_deref(), Some("42"));
    assert!(outcome.warnings.is_empty());
}

#[tokio::test]
async fn tag_failure_is_a_warning_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/contacts"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "c_7" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/contacts/c_7/tags"))
        .and(body_json(json!({ "tagName": "vip" })))
        .respond_with(ResponseTemplate::new(500).set_body_string("tag service down"))
        .mount(&server)
        .await;

    let client = SystemeClient::new(SystemeConfig {
        api_key: Some("sk-test".into()),
        base_url: server.uri(),
        ..SystemeConfig::default()
    });

    let contact = SystemeContact::from_lead("vip@example.com", vec!["vip".into()]);

    let outcome = client.upsert_contact(&contact).await.expect("relay");
    assert_eq!(outcome.status, RelayStatus::Delivered);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("vip"));
}

#[tokio::test]
async fn skips_without_api_key() {
    let client = SystemeClient::new(SystemeConfig::default());
    let contact = SystemeContact::from_lead("lead@example.com", vec![]);

    let outcome = client.upsert_contact(&contact).await.expect("relay");
    assert_eq!(outcome.status, RelayStatus::Skipped);
    assert_eq!(outcome.echo.unwrap()["email"], "lead@example.com");
}

#[tokio::test]
async fn contact_rejection_maps_to_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/contacts"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid email"))
        .mount(&server)
        .await;

    let client = SystemeClient::new(SystemeConfig {
        api_key: Some("sk-test".into()),
        base_url: server.uri(),
        ..SystemeConfig::default()
    });

    let contact = SystemeContact::from_lead("nope", vec![]);
    let err = client.upsert_contact(&contact).await.unwrap_err();
    assert!(matches!(err, ConnectorError::Upstream { status: 422, .. }));
}
