//! Configuration management for Kiosk Export.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Kiosk Export uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `KIOSK_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use kiosk_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("kiosk.toml")?;
//!
//! println!("Embark server: {}", config.embark.server_address);
//! println!("Harvest mode: {}", config.embark.mode);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level, single-record mode
//! - [`EmbarkConfig`] - Embark server address, mode, layouts
//! - [`WorkspaceConfig`] - Local working folder and composite file names
//! - [`ProcessingConfig`] - Record tag, identifier paths, required fields
//! - [`GoogleConfig`] - Drive credentials and destination folders
//! - [`S3Config`] - Secondary copy bucket and key prefix
//! - [`NotificationConfig`] - Missing-field email
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [embark]
//! server_address = "https://embark.example.edu"
//! mode = "incremental"
//! hours_threshold = 72
//!
//! [google]
//! enabled = true
//! credentials.client_email = "harvester@project.iam.gserviceaccount.com"
//! credentials.private_key = "${KIOSK_GOOGLE_PRIVATE_KEY}"
//!
//! [google.metadata]
//! drive_id = "0AASeuQIa42uxUk9PVA"
//! parent_folder_id = "1F5cgW7ORRGHcpy2fbYiFE528RuDjHnrJ"
//!
//! [[processing.json_required_fields]]
//! name = "Title"
//! path = "title"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, DriveFolderConfig, EmbarkConfig, GoogleConfig, GoogleCredentials,
    HarvestMode, KioskConfig, LoggingConfig, NotificationConfig, ProcessingConfig, RequiredField,
    S3Config, WorkspaceConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
