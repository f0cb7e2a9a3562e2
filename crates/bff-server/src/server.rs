use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use bff_connectors::{EmailRelay, OcoyaClient, SystemeClient};

use crate::scheduler::ReportScheduler;
use crate::{config::AppConfig, handlers, middleware as app_middleware, routes};

/// Shared state: configuration plus one client per upstream integration.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub ocoya: Arc<OcoyaClient>,
    pub systeme: Arc<SystemeClient>,
    pub email: Arc<EmailRelay>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            ocoya: Arc::new(OcoyaClient::new(config.ocoya.clone())),
            systeme: Arc::new(SystemeClient::new(config.systeme.clone())),
            email: Arc::new(EmailRelay::new(config.email.clone())),
            config: Arc::new(config),
        }
    }
}

pub struct BffServer {
    addr: SocketAddr,
    app: Router,
    state: AppState,
}

pub fn build_app(cfg: &AppConfig) -> Router {
    build_app_with_state(AppState::new(cfg.clone()))
}

pub fn build_app_with_state(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // Browser favicon shortcut
        .route("/favicon.ico", get(handlers::favicon))
        // Core integrations
        .route(
            "/social/publish-ocoya",
            post(routes::integrations::publish_ocoya),
        )
        .route("/systeme/contact", post(routes::integrations::systeme_contact))
        .route("/gmail/send", post(routes::integrations::gmail_send))
        .route(
            "/cron/daily-bff-report",
            post(routes::integrations::daily_report),
        )
        // GPT employee controllers
        .route("/gpt/{agent}", post(routes::gpt::dispatch))
        // Middleware stack; layers added later run earlier, so the request
        // flows: trace -> compression/cors -> request id -> key gate -> route
        .layer(middleware::from_fn_with_state(
            state.clone(),
            app_middleware::require_key,
        ))
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    // Skip creating a span for browser favicon requests to avoid noisy logs
                    if req.uri().path() == "/favicon.ico" {
                        return tracing::span!(tracing::Level::TRACE, "noop");
                    }
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %method,
                        http.target = %uri,
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        if let Some(meta) = span.metadata() {
                            if meta.name() != "noop" {
                                tracing::info!(
                                    http.status = %res.status().as_u16(),
                                    elapsed_ms = %latency.as_millis(),
                                    "request handled"
                                );
                            }
                        }
                    },
                ),
        )
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> BffServer {
        let state = AppState::new(self.config);
        let app = build_app_with_state(state.clone());

        BffServer {
            addr: self.addr,
            app,
            state,
        }
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BffServer {
    pub async fn run(self) -> anyhow::Result<()> {
        // Built-in report cron, when configured
        let scheduler_shutdown =
            ReportScheduler::from_config(self.state.clone()).map(ReportScheduler::start);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        if let Some(tx) = scheduler_shutdown {
            let _ = tx.send(true);
        }

        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
