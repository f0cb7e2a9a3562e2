pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod report;
pub mod routes;
pub mod scheduler;
pub mod server;

pub use config::{AppConfig, AuthConfig, LoggingConfig, ReportConfig, ServerConfig};
pub use errors::ApiError;
pub use observability::{init_tracing, shutdown_tracing};
pub use server::{AppState, BffServer, ServerBuilder, build_app};
