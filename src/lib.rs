// Kiosk Export - Embark museum metadata harvester
// Copyright (c) 2025 Kiosk Export Contributors
// Licensed under the MIT License

//! # Kiosk Export - Embark museum metadata harvester
//!
//! Kiosk Export harvests museum object metadata from an Embark content
//! server, splits the composite METS and JSON exports into per-object
//! records, checks each record for required fields, and distributes the
//! records to Google Drive and S3. Records with missing fields are
//! summarized in a single email per run.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (split, validate, distribute, notify, harvest)
//! - [`adapters`] - External integrations (Embark, Google Drive, S3, SES)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kiosk_export::config::load_config;
//! use kiosk_export::core::harvest::{HarvestPipeline, HarvestSinks};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("kiosk.toml")?;
//!
//!     let sinks = HarvestSinks::from_config(&config).await?;
//!     let pipeline = HarvestPipeline::new(config, sinks)?;
//!     let summary = pipeline.run(chrono::Utc::now()).await?;
//!
//!     println!("Processed {} records", summary.records_processed);
//!     Ok(())
//! }
//! ```
//!
//! ## Splitting
//!
//! Composite METS documents are streamed, never loaded whole. Each record
//! is re-rooted with the namespace declarations it needs, so it serializes
//! as standalone XML:
//!
//! ```rust
//! use kiosk_export::core::split::NamespaceAwareXmlSplitter;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let composite = r#"<root xmlns:mets="http://www.loc.gov/METS/">
//!   <mets:mets><mets:dmdSec ID="a"/></mets:mets>
//!   <mets:mets><mets:dmdSec ID="b"/></mets:mets>
//! </root>"#;
//!
//! let records = NamespaceAwareXmlSplitter::from_reader(composite.as_bytes(), "mets:mets", "")
//!     .collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(records.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All library errors are [`domain::KioskError`]. Failures while handling a
//! single record are recorded in the run summary and processing moves on to
//! the next record.
//!
//! ## Logging
//!
//! Every failure is logged with a `category` field (`fetch`, `parse`,
//! `missing_field`, `upsert`, `secondary_storage`, `notification`, ...):
//!
//! ```rust,no_run
//! tracing::warn!(category = "missing_field", object_id = "obj1", "Required field missing");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
