use chatwire::cli::Args;
use chatwire::config::{Config, FileConfig, RolePolicy, TimestampFormat};
use clap::Parser;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_yaml_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chatwire.yaml");
    fs::write(
        &path,
        r#"
timestamp:
  format: unix_seconds
roles:
  allowed: [user, assistant, system]
thread:
  require_echo: true
  id_pattern: "thread_[a-z0-9]+"
payload:
  pretty: true
"#,
    )
    .unwrap();

    let file_config = FileConfig::load_from(&path).unwrap();
    let config = Config::from_file_config(&file_config).unwrap();

    assert_eq!(config.timestamp_format, TimestampFormat::UnixSeconds);
    assert_eq!(
        config.roles,
        RolePolicy::Restricted(vec!["user".into(), "assistant".into(), "system".into()])
    );
    assert!(config.thread.require_echo);
    assert!(config.thread.accepts("thread_42"));
    assert!(!config.thread.accepts("thread_42 "));
    assert!(config.pretty);
    assert!(!config.strict);
}

#[test]
fn test_load_json_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chatwire.json");
    fs::write(&path, r#"{"payload": {"strict": true}}"#).unwrap();

    let config = Config::from_file_config(&FileConfig::load_from(&path).unwrap()).unwrap();
    assert!(config.strict);
    assert_eq!(config.timestamp_format, TimestampFormat::Rfc3339);
}

#[test]
fn test_invalid_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chatwire.yaml");
    fs::write(&path, "timestamp: 42").unwrap();

    let err = FileConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse YAML config file"));
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = FileConfig::load_from(&temp_dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_bad_pattern_in_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chatwire.yaml");
    fs::write(&path, "thread:\n  id_pattern: \"[unclosed\"\n").unwrap();

    let file_config = FileConfig::load_from(&path).unwrap();
    let err = Config::from_file_config(&file_config).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_config_paths_prefer_local_files() {
    let paths = FileConfig::get_config_paths();
    assert_eq!(paths[0].to_str(), Some(".chatwire.yaml"));
    assert_eq!(paths[2].to_str(), Some(".chatwire.json"));
}

#[test]
fn test_args_override_env_override_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chatwire.yaml");
    fs::write(
        &path,
        r#"
timestamp:
  format: rfc3339
roles:
  allowed: [user, assistant]
thread:
  require_echo: false
payload:
  strict: false
  reject_empty_message: true
"#,
    )
    .unwrap();

    let args = Args::parse_from([
        "chatwire",
        "--config",
        path.to_str().unwrap(),
        "--timestamp-format",
        "unix_millis",
        "--pretty",
    ]);
    let vars: HashMap<&str, &str> = HashMap::from([
        ("CHATWIRE_TIMESTAMP_FORMAT", "http_date"),
        ("CHATWIRE_REQUIRE_THREAD_ECHO", "true"),
        ("CHATWIRE_STRICT", "true"),
    ]);

    let config = Config::from_args_with_env(&args, |name| vars.get(name).map(|v| v.to_string()))
        .unwrap();

    // CLI beats env
    assert_eq!(config.timestamp_format, TimestampFormat::UnixMillis);
    assert!(config.pretty);
    // env beats file
    assert!(config.thread.require_echo);
    assert!(config.strict);
    // file beats defaults
    assert!(config.reject_empty_message);
    assert_eq!(
        config.roles,
        RolePolicy::Restricted(vec!["user".into(), "assistant".into()])
    );
    // untouched everywhere
    assert!(!config.naive_as_utc);
}

#[test]
fn test_strict_flag_overrides_env() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chatwire.json");
    fs::write(&path, "{}").unwrap();

    let args = Args::parse_from(["chatwire", "--config", path.to_str().unwrap(), "--strict"]);
    let config = Config::from_args_with_env(&args, |name| {
        (name == "CHATWIRE_STRICT").then(|| "false".to_string())
    })
    .unwrap();
    assert!(config.strict);
}

#[test]
fn test_bad_timestamp_flag_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chatwire.json");
    fs::write(&path, "{}").unwrap();

    let args = Args::parse_from([
        "chatwire",
        "--config",
        path.to_str().unwrap(),
        "--timestamp-format",
        "julian",
    ]);
    let err = Config::from_args_with_env(&args, |_| None).unwrap_err();
    assert!(err.to_string().contains("unknown timestamp format"));
}
