//! Integration tests for logging functionality
//!
//! A global subscriber can be installed only once per process, so a
//! single test exercises `init_logging` end to end.

use kiosk_export::config::{parse_config, LoggingConfig};
use kiosk_export::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_logging_section_parsed() {
    let config = parse_config(
        r#"
[embark]
server_address = "https://embark.example.edu"

[logging]
local_enabled = true
local_path = "/var/log/kiosk"
local_rotation = "hourly"
"#,
    )
    .unwrap();

    assert_eq!(config.logging.local_path, "/var/log/kiosk");
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_init_logging_creates_log_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "daily".to_string(),
    };

    assert!(!log_path.exists());
    let guard = init_logging("debug", &config).expect("logging should initialize");
    tracing::info!(category = "fetch", url = "https://embark.example.edu", "test event");
    drop(guard);

    assert!(log_path.is_dir());
    let files: Vec<_> = std::fs::read_dir(&log_path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(files.iter().any(|name| name.starts_with("kiosk-export.log")));
}
