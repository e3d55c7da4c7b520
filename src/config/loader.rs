//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::KioskConfig;
use super::secret::secret_string;
use crate::domain::errors::KioskError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into KioskConfig
/// 4. Applies environment variable overrides (KIOSK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use kiosk_export::config::loader::load_config;
///
/// let config = load_config("kiosk.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<KioskConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(KioskError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        KioskError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses, overrides and validates configuration text
///
/// Split out of [`load_config`] so callers holding TOML in memory (tests,
/// `init`) go through the same pipeline.
pub fn parse_config(contents: &str) -> Result<KioskConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: KioskConfig = toml::from_str(&contents)
        .map_err(|e| KioskError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        KioskError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are passed through untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| KioskError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(KioskError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_bool(name: &str, current: bool) -> bool {
    match std::env::var(name) {
        Ok(val) => val.parse().unwrap_or(current),
        Err(_) => current,
    }
}

/// Applies environment variable overrides using KIOSK_* prefix
///
/// Environment variables follow the pattern: KIOSK_<SECTION>_<KEY>
/// For example: KIOSK_EMBARK_SERVER_ADDRESS, KIOSK_EMBARK_MODE
fn apply_env_overrides(config: &mut KioskConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("KIOSK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    config.application.single_record_mode = env_bool(
        "KIOSK_APPLICATION_SINGLE_RECORD_MODE",
        config.application.single_record_mode,
    );

    // Embark overrides
    if let Ok(val) = std::env::var("KIOSK_EMBARK_SERVER_ADDRESS") {
        config.embark.server_address = val;
    }
    if let Ok(val) = std::env::var("KIOSK_EMBARK_MODE") {
        config.embark.mode = val.parse().map_err(KioskError::Configuration)?;
    }
    if let Ok(val) = std::env::var("KIOSK_EMBARK_HOURS_THRESHOLD") {
        if let Ok(hours) = val.parse() {
            config.embark.hours_threshold = hours;
        }
    }
    if let Ok(val) = std::env::var("KIOSK_EMBARK_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.embark.timeout_seconds = secs;
        }
    }

    // Workspace overrides
    if let Ok(val) = std::env::var("KIOSK_WORKSPACE_FOLDER") {
        config.workspace.folder = val;
    }
    config.workspace.delete_local_copy = env_bool(
        "KIOSK_WORKSPACE_DELETE_LOCAL_COPY",
        config.workspace.delete_local_copy,
    );

    // Processing overrides
    config.processing.process_mets =
        env_bool("KIOSK_PROCESSING_PROCESS_METS", config.processing.process_mets);
    config.processing.process_json =
        env_bool("KIOSK_PROCESSING_PROCESS_JSON", config.processing.process_json);

    // Google overrides
    config.google.enabled = env_bool("KIOSK_GOOGLE_ENABLED", config.google.enabled);
    if let Ok(val) = std::env::var("KIOSK_GOOGLE_API_BASE_URL") {
        config.google.api_base_url = val;
    }
    if let Ok(val) = std::env::var("KIOSK_GOOGLE_CLIENT_EMAIL") {
        config.google.credentials.client_email = val;
    }
    if let Ok(val) = std::env::var("KIOSK_GOOGLE_PRIVATE_KEY") {
        config.google.credentials.private_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("KIOSK_GOOGLE_ACCESS_TOKEN") {
        config.google.credentials.access_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("KIOSK_GOOGLE_METADATA_DRIVE_ID") {
        config.google.metadata.drive_id = val;
    }
    if let Ok(val) = std::env::var("KIOSK_GOOGLE_METADATA_PARENT_FOLDER_ID") {
        config.google.metadata.parent_folder_id = val;
    }

    // S3 overrides
    config.s3.enabled = env_bool("KIOSK_S3_ENABLED", config.s3.enabled);
    if let Ok(val) = std::env::var("KIOSK_S3_BUCKET") {
        config.s3.bucket = val;
    }
    if let Ok(val) = std::env::var("KIOSK_S3_KEY_PREFIX") {
        config.s3.key_prefix = val;
    }

    // Notification overrides
    config.notification.enabled =
        env_bool("KIOSK_NOTIFICATION_ENABLED", config.notification.enabled);
    if let Ok(val) = std::env::var("KIOSK_NOTIFICATION_SENDER") {
        config.notification.sender = val;
    }
    if let Ok(val) = std::env::var("KIOSK_NOTIFICATION_RECIPIENTS") {
        config.notification.recipients = val;
    }

    // Logging overrides
    config.logging.local_enabled =
        env_bool("KIOSK_LOGGING_LOCAL_ENABLED", config.logging.local_enabled);
    if let Ok(val) = std::env::var("KIOSK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
