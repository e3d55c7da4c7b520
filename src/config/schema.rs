//! Configuration schema types
//!
//! This module defines the configuration structure for Kiosk Export. A
//! [`KioskConfig`] is loaded once per run, validated, and then handed by
//! value (or `Arc`) to every component; nothing mutates it afterwards.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Harvest mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HarvestMode {
    /// Every object on the Embark server
    Full,
    /// Only objects modified within `hours_threshold`
    #[default]
    Incremental,
}

impl fmt::Display for HarvestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarvestMode::Full => write!(f, "full"),
            HarvestMode::Incremental => write!(f, "incremental"),
        }
    }
}

impl FromStr for HarvestMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(HarvestMode::Full),
            "incremental" => Ok(HarvestMode::Incremental),
            other => Err(format!(
                "Invalid mode '{other}'. Must be one of: full, incremental"
            )),
        }
    }
}

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KioskConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Embark content server
    pub embark: EmbarkConfig,

    /// Local working folder
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Splitting and validation settings
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Google Drive distribution
    #[serde(default)]
    pub google: GoogleConfig,

    /// S3 secondary copy
    #[serde(default)]
    pub s3: S3Config,

    /// Missing-field notification email
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KioskConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.embark.validate()?;
        self.workspace.validate()?;
        self.processing.validate()?;
        self.google.validate()?;
        self.s3.validate()?;
        self.notification.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Stop each per-record loop after its first record (test runs)
    #[serde(default)]
    pub single_record_mode: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            single_record_mode: false,
        }
    }
}

/// Embark content server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbarkConfig {
    /// Base address of the Embark server, e.g. `https://embark.example.edu`
    pub server_address: String,

    /// Harvest mode (full or incremental)
    #[serde(default)]
    pub mode: HarvestMode,

    /// Look-back window for incremental mode
    #[serde(default = "default_hours_threshold")]
    pub hours_threshold: u32,

    /// Embark layout producing composite METS
    #[serde(default = "default_mets_layout")]
    pub mets_layout: String,

    /// Embark layout producing composite JSON
    #[serde(default = "default_json_layout")]
    pub json_layout: String,

    /// Request timeout in seconds (full exports are slow)
    #[serde(default = "default_fetch_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl EmbarkConfig {
    fn validate(&self) -> Result<(), String> {
        if self.server_address.is_empty() {
            return Err("embark.server_address cannot be empty".to_string());
        }

        if !self.server_address.starts_with("http://")
            && !self.server_address.starts_with("https://")
        {
            return Err("embark.server_address must start with http:// or https://".to_string());
        }

        url::Url::parse(&self.server_address)
            .map_err(|e| format!("embark.server_address is not a valid URL: {e}"))?;

        if self.hours_threshold == 0 {
            return Err("embark.hours_threshold must be > 0".to_string());
        }

        if self.mets_layout.is_empty() || self.json_layout.is_empty() {
            return Err("embark layouts cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("embark.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for EmbarkConfig {
    fn default() -> Self {
        Self {
            server_address: "http://localhost:8080".to_string(),
            mode: HarvestMode::default(),
            hours_threshold: default_hours_threshold(),
            mets_layout: default_mets_layout(),
            json_layout: default_json_layout(),
            timeout_seconds: default_fetch_timeout_seconds(),
        }
    }
}

/// Local working folder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Folder holding the composite documents and per-object artifacts
    #[serde(default = "default_workspace_folder")]
    pub folder: String,

    /// File name of the composite METS document
    #[serde(default = "default_xml_file_name")]
    pub xml_file_name: String,

    /// File name of the composite JSON document
    #[serde(default = "default_json_file_name")]
    pub json_file_name: String,

    /// Delete per-object artifacts after distribution and the composite
    /// document at the end of each pass
    #[serde(default = "default_true")]
    pub delete_local_copy: bool,
}

impl WorkspaceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.folder.is_empty() {
            return Err("workspace.folder cannot be empty".to_string());
        }
        for name in [&self.xml_file_name, &self.json_file_name] {
            if name.is_empty() {
                return Err("workspace file names cannot be empty".to_string());
            }
            if name.contains('/') || name.contains('\\') {
                return Err(format!(
                    "workspace file name '{name}' must not contain path separators"
                ));
            }
        }
        Ok(())
    }

    /// Folder as a path
    pub fn folder_path(&self) -> &Path {
        Path::new(&self.folder)
    }

    /// Full path of the composite METS document
    pub fn xml_path(&self) -> PathBuf {
        self.folder_path().join(&self.xml_file_name)
    }

    /// Full path of the composite JSON document
    pub fn json_path(&self) -> PathBuf {
        self.folder_path().join(&self.json_file_name)
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            folder: default_workspace_folder(),
            xml_file_name: default_xml_file_name(),
            json_file_name: default_json_file_name(),
            delete_local_copy: true,
        }
    }
}

/// One required field: display name and the path that must resolve to a
/// non-empty value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredField {
    /// Human-readable field name used in reports
    pub name: String,

    /// XPath-like path (XML) or top-level key (JSON)
    pub path: String,
}

impl RequiredField {
    /// Creates a required field entry
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Splitting and validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Run the composite METS pass
    #[serde(default = "default_true")]
    pub process_mets: bool,

    /// Run the composite JSON pass
    #[serde(default = "default_true")]
    pub process_json: bool,

    /// Qualified name of the repeated top-level object element
    #[serde(default = "default_xml_record_tag")]
    pub xml_record_tag: String,

    /// Path, relative to a record, of the object identifier
    #[serde(default = "default_xml_identifier_path")]
    pub xml_identifier_path: String,

    /// Key holding the object identifier in JSON records
    #[serde(default = "default_json_identifier_field")]
    pub json_identifier_field: String,

    /// Value stamped as `xsi:schemaLocation` on every split METS record
    #[serde(default = "default_xsi_schema_location")]
    pub xsi_schema_location: String,

    /// Required fields for METS records, in report order
    #[serde(default)]
    pub xml_required_fields: Vec<RequiredField>,

    /// Required fields for JSON records, in report order
    #[serde(default)]
    pub json_required_fields: Vec<RequiredField>,
}

impl ProcessingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.xml_record_tag.trim().is_empty() {
            return Err("processing.xml_record_tag cannot be empty".to_string());
        }
        if self.xml_identifier_path.trim().is_empty() {
            return Err("processing.xml_identifier_path cannot be empty".to_string());
        }
        if self.json_identifier_field.trim().is_empty() {
            return Err("processing.json_identifier_field cannot be empty".to_string());
        }
        for field in self
            .xml_required_fields
            .iter()
            .chain(self.json_required_fields.iter())
        {
            if field.name.trim().is_empty() || field.path.trim().is_empty() {
                return Err(format!(
                    "required field entries need both name and path (got name='{}', path='{}')",
                    field.name, field.path
                ));
            }
        }
        Ok(())
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            process_mets: true,
            process_json: true,
            xml_record_tag: default_xml_record_tag(),
            xml_identifier_path: default_xml_identifier_path(),
            json_identifier_field: default_json_identifier_field(),
            xsi_schema_location: default_xsi_schema_location(),
            xml_required_fields: Vec::new(),
            json_required_fields: Vec::new(),
        }
    }
}

/// Google service account credentials
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GoogleCredentials {
    /// Service account email (JWT issuer)
    #[serde(default)]
    pub client_email: String,

    /// PEM private key of the service account
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub private_key: Option<SecretString>,

    /// Key id placed in the JWT header
    #[serde(default)]
    pub private_key_id: Option<String>,

    /// OAuth token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,

    /// Pre-issued bearer token; bypasses the service account exchange
    #[serde(default)]
    pub access_token: Option<SecretString>,
}

/// Drive id + parent folder pair
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DriveFolderConfig {
    /// Shared drive (collection) id
    #[serde(default)]
    pub drive_id: String,

    /// Parent folder id inside the shared drive
    #[serde(default)]
    pub parent_folder_id: String,
}

impl DriveFolderConfig {
    fn validate(&self, section: &str) -> Result<(), String> {
        if self.drive_id.is_empty() {
            return Err(format!("{section}.drive_id cannot be empty"));
        }
        if self.parent_folder_id.is_empty() {
            return Err(format!("{section}.parent_folder_id cannot be empty"));
        }
        Ok(())
    }
}

/// Google Drive configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Upload per-object artifacts to Google Drive
    #[serde(default)]
    pub enabled: bool,

    /// Drive API root
    #[serde(default = "default_google_api_base_url")]
    pub api_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Service account credentials
    #[serde(default)]
    pub credentials: GoogleCredentials,

    /// Destination of metadata artifacts
    #[serde(default)]
    pub metadata: DriveFolderConfig,

    /// Destination of image assets (managed by the image pipeline)
    #[serde(default)]
    pub image: Option<DriveFolderConfig>,
}

impl GoogleConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err("google.api_base_url must start with http:// or https://".to_string());
        }

        if self.credentials.access_token.is_none() {
            if self.credentials.client_email.is_empty() {
                return Err(
                    "google.credentials.client_email cannot be empty when google is enabled"
                        .to_string(),
                );
            }
            if self.credentials.private_key.is_none() {
                return Err(
                    "google.credentials.private_key is required when google is enabled"
                        .to_string(),
                );
            }
        }

        self.metadata.validate("google.metadata")?;
        if let Some(image) = &self.image {
            image.validate("google.image")?;
        }
        Ok(())
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base_url: default_google_api_base_url(),
            timeout_seconds: default_request_timeout_seconds(),
            credentials: GoogleCredentials {
                token_uri: default_token_uri(),
                ..Default::default()
            },
            metadata: DriveFolderConfig::default(),
            image: None,
        }
    }
}

/// S3 secondary copy configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct S3Config {
    /// Copy per-object artifacts to S3
    #[serde(default)]
    pub enabled: bool,

    /// Destination bucket
    #[serde(default)]
    pub bucket: String,

    /// Key prefix, e.g. `embark-separated-json-records/`
    #[serde(default)]
    pub key_prefix: String,

    /// Region override; the AWS default chain is used otherwise
    #[serde(default)]
    pub region: Option<String>,
}

impl S3Config {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.bucket.is_empty() {
            return Err("s3.bucket cannot be empty when s3 is enabled".to_string());
        }
        Ok(())
    }

    /// Object key for a local file name
    pub fn key_for(&self, file_name: &str) -> String {
        if self.key_prefix.is_empty() || self.key_prefix.ends_with('/') {
            format!("{}{}", self.key_prefix, file_name)
        } else {
            format!("{}/{}", self.key_prefix, file_name)
        }
    }
}

/// Missing-field notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Send the summary email
    #[serde(default)]
    pub enabled: bool,

    /// From address
    #[serde(default)]
    pub sender: String,

    /// Comma-separated recipient list
    #[serde(default)]
    pub recipients: String,

    /// SES region
    #[serde(default = "default_notification_region")]
    pub region: String,
}

impl NotificationConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.sender.trim().is_empty() {
            return Err("notification.sender cannot be empty when enabled".to_string());
        }
        if self.recipient_list().is_empty() {
            return Err("notification.recipients cannot be empty when enabled".to_string());
        }
        Ok(())
    }

    /// Recipients split on commas, blanks dropped
    pub fn recipient_list(&self) -> Vec<String> {
        self.recipients
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sender: String::new(),
            recipients: String::new(),
            region: default_notification_region(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_hours_threshold() -> u32 {
    72
}

fn default_mets_layout() -> String {
    "marble_mets".to_string()
}

fn default_json_layout() -> String {
    "marble".to_string()
}

fn default_fetch_timeout_seconds() -> u64 {
    1800
}

fn default_request_timeout_seconds() -> u64 {
    60
}

fn default_workspace_folder() -> String {
    "/tmp/kiosk-export".to_string()
}

fn default_xml_file_name() -> String {
    "web_kiosk_composite_metadata.xml".to_string()
}

fn default_json_file_name() -> String {
    "web_kiosk_composite_metadata.json".to_string()
}

fn default_xml_record_tag() -> String {
    "mets:mets".to_string()
}

fn default_xml_identifier_path() -> String {
    r#"mets:dmdSec[@ID="DSC_01_SNITE"]/mets:mdWrap[@MDTYPE="DC"]/mets:xmlData/dcterms:identifier"#
        .to_string()
}

fn default_json_identifier_field() -> String {
    "uniqueIdentifier".to_string()
}

fn default_xsi_schema_location() -> String {
    "http://www.loc.gov/METS/ http://www.loc.gov/standards/mets/mets.xsd \
     http://purl.org/dc/terms/ http://dublincore.org/schemas/xmls/qdc/2008/02/11/dcterms.xsd \
     http://www.vraweb.org/vracore4.htm http://www.loc.gov/standards/vracore/vra-strict.xsd"
        .to_string()
}

fn default_google_api_base_url() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_notification_region() -> String {
    "us-east-1".to_string()
}

fn default_local_path() -> String {
    "/var/log/kiosk-export".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
