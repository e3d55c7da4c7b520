//! Core business logic for Kiosk Export.
//!
//! # Modules
//!
//! - [`split`] - Streaming METS splitter and composite JSON splitter
//! - [`validate`] - Required-field validation and the missing-field report
//! - [`distribute`] - Create-or-update of per-object artifacts in the document store
//! - [`notify`] - End-of-run missing-field email
//! - [`harvest`] - Orchestration, run summary and local workspace
//!
//! # Harvest Workflow
//!
//! 1. **Fetch**: Query Embark for the composite METS document (full or incremental)
//! 2. **Split**: Stream the document into standalone per-object records
//! 3. **Validate**: Check each record for the configured required fields
//! 4. **Distribute**: Write `<id>.xml`, upsert it to Drive, copy it to S3
//! 5. Repeat steps 1-4 for the composite JSON document
//! 6. **Notify**: Email the missing-field report if anything was missing
//!
//! # Example
//!
//! ```rust,no_run
//! use kiosk_export::config::load_config;
//! use kiosk_export::core::harvest::{HarvestPipeline, HarvestSinks};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("kiosk.toml")?;
//!
//! let sinks = HarvestSinks::from_config(&config).await?;
//! let pipeline = HarvestPipeline::new(config, sinks)?;
//!
//! let summary = pipeline.run(chrono::Utc::now()).await?;
//!
//! println!("Processed: {}", summary.records_processed);
//! println!("Failed: {}", summary.records_failed);
//! # Ok(())
//! # }
//! ```

pub mod distribute;
pub mod harvest;
pub mod notify;
pub mod split;
pub mod validate;
