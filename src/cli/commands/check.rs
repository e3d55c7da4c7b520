//! Check command implementation
//!
//! Splits and validates a composite document already on disk, using the
//! `[processing]` settings of the configuration file. Nothing is fetched or
//! distributed.

use crate::config::load_config;
use crate::core::harvest::check_composite;
use crate::domain::RecordFormat;
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Composite METS or JSON file
    pub file: PathBuf,

    /// Record format (xml or json); inferred from the file extension if omitted
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

impl CheckArgs {
    /// Format to split the file as
    pub fn resolve_format(&self) -> Result<RecordFormat, String> {
        match &self.format {
            Some(format) => format.parse(),
            None => Ok(infer_format(&self.file)),
        }
    }

    /// Execute the check command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(file = %self.file.display(), "Checking composite file");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let format = match self.resolve_format() {
            Ok(f) => f,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        println!("🔍 Checking {} as {format}", self.file.display());
        println!();

        let outcome = match check_composite(&config.processing, &self.file, format) {
            Ok(o) => o,
            Err(e) => {
                println!("❌ Check failed");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        println!("  Records: {}", outcome.records);
        println!("  Without identifier: {}", outcome.unidentified);
        println!(
            "  With missing fields: {} ({} fields)",
            outcome.report.object_count(),
            outcome.report.field_count()
        );
        println!();

        if outcome.report.is_empty() && outcome.unidentified == 0 {
            println!("✅ All records carry their required fields");
            return Ok(0);
        }

        if !outcome.report.is_empty() {
            println!("⚠️  Missing required fields:");
            println!("{}", outcome.report.as_str());
        }
        Ok(1)
    }
}

fn infer_format(path: &Path) -> RecordFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => RecordFormat::Json,
        _ => RecordFormat::Xml,
    }
}
