//! External system integrations for Kiosk Export.
//!
//! - [`embark`] - Embark content server (composite METS/JSON source)
//! - [`store`] - Distribution sink traits and factory
//! - [`gdrive`] - Google Drive implementation of the document store
//! - [`s3`] - Amazon S3 secondary copy
//! - [`ses`] - Amazon SES notification email
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the harvest
//! pipeline can run against in-memory implementations in tests.
//!
//! ```rust,no_run
//! use kiosk_export::adapters::embark::{metadata_url, EmbarkClient, MetadataSource};
//! use kiosk_export::config::EmbarkConfig;
//! use kiosk_export::domain::RecordFormat;
//!
//! # async fn example() -> kiosk_export::domain::Result<()> {
//! let config = EmbarkConfig {
//!     server_address: "https://embark.example.edu".to_string(),
//!     ..Default::default()
//! };
//! let client = EmbarkClient::new(&config)?;
//! let url = metadata_url(&config, RecordFormat::Json, chrono::Utc::now());
//! let body = client.fetch(&url).await?;
//! # Ok(())
//! # }
//! ```

pub mod embark;
pub mod gdrive;
pub mod s3;
pub mod ses;
pub mod store;
