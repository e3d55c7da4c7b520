//! Harvest command implementation
//!
//! This module implements the `harvest` command: one full run of the
//! METS and JSON passes against Embark.

use crate::config::{load_config, HarvestMode, KioskConfig};
use crate::core::harvest::{HarvestPipeline, HarvestSinks, HarvestSummary};
use clap::Args;

/// Arguments for the harvest command
#[derive(Args, Debug, Default)]
pub struct HarvestArgs {
    /// Override harvest mode (full or incremental)
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Skip the composite METS pass
    #[arg(long)]
    pub skip_mets: bool,

    /// Skip the composite JSON pass
    #[arg(long)]
    pub skip_json: bool,

    /// Stop each pass after its first record
    #[arg(long)]
    pub single_record: bool,
}

impl HarvestArgs {
    /// Apply CLI overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut KioskConfig) -> Result<(), String> {
        if let Some(mode) = &self.mode {
            let mode: HarvestMode = mode.parse()?;
            tracing::info!(mode = %mode, "Overriding harvest mode from CLI");
            config.embark.mode = mode;
        }
        if self.skip_mets {
            config.processing.process_mets = false;
        }
        if self.skip_json {
            config.processing.process_json = false;
        }
        if self.single_record {
            tracing::info!("Enabling single-record mode from CLI");
            config.application.single_record_mode = true;
        }
        Ok(())
    }

    /// Execute the harvest command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting harvest command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = self.apply_overrides(&mut config) {
            eprintln!("Invalid argument: {e}");
            return Ok(2);
        }

        if !config.processing.process_mets && !config.processing.process_json {
            println!("Nothing to do: both the METS and JSON passes are disabled");
            return Ok(0);
        }

        let sinks = match HarvestSinks::from_config(&config).await {
            Ok(s) => s,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to create harvest sinks");
                eprintln!("Failed to initialize harvest: {e}");
                return Ok(2);
            }
        };

        let pipeline = match HarvestPipeline::new(config, sinks) {
            Ok(p) => p,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to create harvest pipeline");
                eprintln!("Failed to initialize harvest: {e}");
                return Ok(2);
            }
        };

        println!("🚀 Starting harvest...");
        println!();

        let summary = match pipeline.run(chrono::Utc::now()).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Harvest failed");
                eprintln!("Harvest failed: {e}");
                return Ok(5);
            }
        };

        summary.log_summary();
        print_summary(&summary);

        let exit_code = if summary.is_successful() {
            println!("✅ Harvest completed successfully!");
            0
        } else {
            println!("⚠️  Harvest completed with failures");
            1
        };

        Ok(exit_code)
    }
}

fn print_summary(summary: &HarvestSummary) {
    println!("📊 Harvest Summary:");
    println!("  Records Seen: {}", summary.records_seen);
    println!("  Processed: {}", summary.records_processed);
    println!("  Failed: {}", summary.records_failed);
    println!("  Missing Fields: {}", summary.records_with_missing_fields);
    println!(
        "  Drive Files: {} created, {} updated",
        summary.files_created, summary.files_updated
    );
    println!("  S3 Copies: {}", summary.objects_copied);
    println!("  Digital Assets: {}", summary.digital_assets);
    println!(
        "  Notification: {}",
        if summary.notification_sent { "sent" } else { "not sent" }
    );
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in &summary.errors {
            println!("  - {error}");
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn config() -> KioskConfig {
        parse_config(
            r#"
[embark]
server_address = "https://embark.example.edu"
mode = "incremental"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_harvest_args_defaults() {
        let args = HarvestArgs::default();
        let mut config = config();

        args.apply_overrides(&mut config).unwrap();

        assert_eq!(config.embark.mode, HarvestMode::Incremental);
        assert!(config.processing.process_mets);
        assert!(config.processing.process_json);
        assert!(!config.application.single_record_mode);
    }

    #[test]
    fn test_harvest_args_with_overrides() {
        let args = HarvestArgs {
            mode: Some("full".to_string()),
            skip_mets: true,
            skip_json: false,
            single_record: true,
        };
        let mut config = config();

        args.apply_overrides(&mut config).unwrap();

        assert_eq!(config.embark.mode, HarvestMode::Full);
        assert!(!config.processing.process_mets);
        assert!(config.application.single_record_mode);
    }

    #[test]
    fn test_harvest_args_invalid_mode() {
        let args = HarvestArgs {
            mode: Some("partial".to_string()),
            ..Default::default()
        };

        assert!(args.apply_overrides(&mut config()).is_err());
    }

    #[tokio::test]
    async fn test_missing_config_is_configuration_error() {
        let code = HarvestArgs::default()
            .execute("nonexistent-kiosk.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
