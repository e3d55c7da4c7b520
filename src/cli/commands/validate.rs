//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Kiosk Export configuration file.

use crate::config::load_config;
use crate::core::validate::{FieldPathMap, XmlPath};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also runs validate()
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        // Paths are only compiled by the pipeline, so check them here too
        let processing = &config.processing;
        if let Err(e) = XmlPath::parse(&processing.xml_identifier_path)
            .and_then(|_| FieldPathMap::for_xml(&processing.xml_required_fields))
        {
            println!("❌ Configuration validation failed");
            println!("   Error: {e}");
            println!();
            return Ok(2);
        }

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Single Record Mode: {}", config.application.single_record_mode);
        println!("  Embark Server: {}", config.embark.server_address);
        println!("  Harvest Mode: {}", config.embark.mode);
        if config.embark.mode == crate::config::HarvestMode::Incremental {
            println!("  Hours Threshold: {}", config.embark.hours_threshold);
        }
        println!("  Workspace: {}", config.workspace.folder);
        println!("  Delete Local Copy: {}", config.workspace.delete_local_copy);
        println!(
            "  Passes: METS={} JSON={}",
            processing.process_mets, processing.process_json
        );
        println!(
            "  Required Fields: {} xml, {} json",
            processing.xml_required_fields.len(),
            processing.json_required_fields.len()
        );

        if config.google.enabled {
            println!(
                "  Google Drive: drive {} / folder {}",
                config.google.metadata.drive_id, config.google.metadata.parent_folder_id
            );
        } else {
            println!("  Google Drive: disabled");
        }

        if config.s3.enabled {
            println!(
                "  S3: s3://{}/{}",
                config.s3.bucket,
                config.s3.key_for("<object>.json")
            );
        } else {
            println!("  S3: disabled");
        }

        if config.notification.enabled {
            println!(
                "  Notification: {} -> {}",
                config.notification.sender,
                config.notification.recipient_list().join(", ")
            );
        } else {
            println!("  Notification: disabled");
        }
        println!();

        Ok(0)
    }
}
