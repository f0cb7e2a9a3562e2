use std::{env, fs};

use bff_server::config::loader::load_config;

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    // Create a temporary TOML configuration file
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("bff.toml");

    let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8081
body_limit_bytes = 1024

[auth]
enabled = true
key = "test-secret"

[ocoya]
api_key = "ocoya-key"
timeout_secs = 10

[report]
recipient = "vince@bffaitrainer.com"
cron = "0 8 * * *"

[logging]
level = "debug"
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.auth.key, "test-secret");
    assert_eq!(cfg.ocoya.api_key.as_deref(), Some("ocoya-key"));
    assert_eq!(cfg.ocoya.timeout_secs, 10);
    assert_eq!(cfg.report.cron.as_deref(), Some("0 8 * * *"));
    assert_eq!(cfg.logging.level.to_ascii_lowercase(), "debug");
    // Untouched sections keep their defaults
    assert_eq!(cfg.systeme.base_url, "https://api.systeme.io");
    assert!(cfg.email.api_key.is_none());

    // 2) Env override should win over file
    unsafe {
        env::set_var("BFF__SERVER__PORT", "9099");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.server.port, 9099);
    // cleanup env var
    unsafe {
        env::remove_var("BFF__SERVER__PORT");
    }

    // 3) Invalid config (auth enabled without a key) should error
    let invalid_path = dir.path().join("invalid.toml");
    let invalid_toml = r#"
[auth]
enabled = true
key = ""
"#;
    fs::write(&invalid_path, invalid_toml).expect("write invalid toml");
    let err = load_config(invalid_path.to_str()).expect_err("expected validation error");
    assert!(err.contains("auth.key"));

    // 4) A bad cron expression is rejected up front
    let bad_cron_path = dir.path().join("bad_cron.toml");
    let bad_cron_toml = r#"
[auth]
enabled = false

[report]
cron = "whenever"
"#;
    fs::write(&bad_cron_path, bad_cron_toml).expect("write bad cron toml");
    let err = load_config(bad_cron_path.to_str()).expect_err("expected validation error");
    assert!(err.contains("report.cron"));
}
