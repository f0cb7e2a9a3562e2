use bff_connectors::{EmailConfig, OcoyaConfig, SystemeConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Shared-secret gate for all mutating routes
    #[serde(default)]
    pub auth: AuthConfig,
    /// Ocoya social posting connector
    #[serde(default)]
    pub ocoya: OcoyaConfig,
    /// Systeme.io CRM connector
    #[serde(default)]
    pub systeme: SystemeConfig,
    /// Email relay (API or SMTP mode)
    #[serde(default)]
    pub email: EmailConfig,
    /// Daily report composition and scheduling
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default derived via field defaults

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Server validations
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        // Auth validation
        if self.auth.enabled && self.auth.key.is_empty() {
            return Err(
                "auth.key must not be empty while auth.enabled=true (set BFF__AUTH__KEY or disable auth)"
                    .into(),
            );
        }
        // Connector validations
        if self.ocoya.timeout_secs == 0 {
            return Err("ocoya.timeout_secs must be > 0".into());
        }
        if self.systeme.timeout_secs == 0 {
            return Err("systeme.timeout_secs must be > 0".into());
        }
        if self.email.timeout_secs == 0 {
            return Err("email.timeout_secs must be > 0".into());
        }
        // Report validation
        if self.report.recipient.is_empty() {
            return Err("report.recipient must not be empty".into());
        }
        if self.report.check_interval_secs == 0 {
            return Err("report.check_interval_secs must be > 0".into());
        }
        if let Some(ref expr) = self.report.cron {
            croner::Cron::new(expr)
                .parse()
                .map_err(|e| format!("report.cron is not a valid cron expression: {e}"))?;
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }

    /// Returns the base URL for the server.
    /// If `base_url` is configured, returns that; otherwise computes from host:port.
    pub fn base_url(&self) -> String {
        self.server
            .base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.server.host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL for the server, used in links and responses.
    /// If not set, defaults to http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            body_limit_bytes: default_body_limit(),
        }
    }
}

/// Shared-secret gate configuration.
///
/// Mutating routes require the `x-bff-key` header to equal `key`. Disabling
/// enforcement (`enabled = false`) restores the original open posture; the
/// gate is on by default and an empty key fails validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_auth_enabled")]
    pub enabled: bool,

    /// Shared secret expected in the x-bff-key header.
    /// Prefer setting via the BFF__AUTH__KEY environment variable.
    #[serde(default)]
    pub key: String,
}

fn default_auth_enabled() -> bool {
    true
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: default_auth_enabled(),
            key: String::new(),
        }
    }
}

/// Daily report configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_recipient")]
    pub recipient: String,

    /// Cron expression for the built-in scheduler. Unset means the report is
    /// only produced on demand via POST /cron/daily-bff-report.
    #[serde(default)]
    pub cron: Option<String>,

    /// How often the scheduler checks whether a run is due (in seconds).
    #[serde(default = "default_report_check_interval")]
    pub check_interval_secs: u64,
}

fn default_report_recipient() -> String {
    "vince@bffaitrainer.com".into()
}

fn default_report_check_interval() -> u64 {
    60
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            recipient: default_report_recipient(),
            cron: None,
            check_interval_secs: default_report_check_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if pathbuf.exists() {
                    builder = builder.add_source(File::from(pathbuf));
                }
            }
            None => {
                // Try default root-level file
                let default_path = PathBuf::from("bff.toml");
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., BFF__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("BFF")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        // Validate
        merged.validate()?;
        Ok(merged)
    }
}
