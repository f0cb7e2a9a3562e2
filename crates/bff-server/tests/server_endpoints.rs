use bff_server::{AppConfig, build_app};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

async fn start_server(cfg: AppConfig) -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let app = build_app(&cfg);

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

fn open_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth.enabled = false;
    cfg
}

#[tokio::test]
async fn health_and_banner_endpoints_work() {
    let (base, shutdown_tx, handle) = start_server(open_config()).await;
    let client = reqwest::Client::new();

    // GET /
    let resp = client.get(format!("{base}/")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["service"], "BFF Middleware v24");
    assert_eq!(body["status"], "ok");

    // GET /health (original shape)
    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["service"], "BFF Middleware v24");

    // GET /healthz
    let resp = client.get(format!("{base}/healthz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    // GET /readyz
    let resp = client.get(format!("{base}/readyz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ready");

    // shutdown
    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn agent_endpoints_echo_the_task() {
    let (base, shutdown_tx, handle) = start_server(open_config()).await;
    let client = reqwest::Client::new();

    // Plain persona: echo under the display name
    let resp = client
        .post(format!("{base}/gpt/ava"))
        .json(&json!({ "intent": "draft_copy", "data": { "topic": "launch" } }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["agent"], "AVA");
    assert_eq!(body["received"]["brand"], "bff");
    assert_eq!(body["received"]["intent"], "draft_copy");
    assert_eq!(body["received"]["data"]["topic"], "launch");
    assert!(body.get("next").is_none());

    // CRIS carries the routing hint
    let resp = client
        .post(format!("{base}/gpt/cris"))
        .json(&json!({ "intent": "plan_day" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["agent"], "CRIS");
    assert_eq!(
        body["next"],
        "route to appropriate agent based on task.intent"
    );

    // REVENUEAI carries the stock-window hint
    let resp = client
        .post(format!("{base}/gpt/revenueai"))
        .json(&json!({ "intent": "kpi_rollup" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["agent"], "REVENUEAI");
    assert_eq!(
        body["hint"],
        "includes stock-window content cadence & KPI rollups"
    );

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn every_persona_answers() {
    let (base, shutdown_tx, handle) = start_server(open_config()).await;
    let client = reqwest::Client::new();

    for agent in bff_core::AgentId::ALL {
        let resp = client
            .post(format!("{base}/gpt/{}", agent.slug()))
            .json(&json!({ "intent": "ping" }))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success(), "agent {} failed", agent.slug());
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["agent"], agent.display_name());
    }

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn unknown_persona_is_a_404() {
    let (base, shutdown_tx, handle) = start_server(open_config()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/gpt/mysteryai"))
        .json(&json!({ "intent": "ping" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "unknown-agent");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn request_id_is_mirrored_on_the_response() {
    let (base, shutdown_tx, handle) = start_server(open_config()).await;
    let client = reqwest::Client::new();

    // Generated when absent
    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert!(resp.headers().contains_key("x-request-id"));

    // Preserved when provided
    let resp = client
        .get(format!("{base}/health"))
        .header("x-request-id", "req-123")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("x-request-id").unwrap().to_str().unwrap(),
        "req-123"
    );

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}
