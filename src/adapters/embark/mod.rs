//! Embark content server integration
//!
//! Builds the `results.html` query for full or incremental harvests and
//! retrieves composite METS/JSON documents over HTTP.

pub mod client;
pub mod query;

pub use client::EmbarkClient;
pub use query::{incremental_since, metadata_url};

use crate::domain::Result;
use async_trait::async_trait;

/// Source of composite metadata documents
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Retrieve the body at `url`
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::EmbarkError`] (wrapped) for refused
    /// connections, timeouts, non-success statuses and undecodable bodies.
    async fn fetch(&self, url: &str) -> Result<String>;
}
