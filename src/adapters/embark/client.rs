//! Embark HTTP client

use super::MetadataSource;
use crate::config::EmbarkConfig;
use crate::domain::{EmbarkError, KioskError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Embark content server client
///
/// One GET per composite document, no retries.
pub struct EmbarkClient {
    client: Client,
}

impl EmbarkClient {
    /// Create a client using the configured timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &EmbarkConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| KioskError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

fn classify(url: &str, err: reqwest::Error) -> EmbarkError {
    if err.is_timeout() {
        EmbarkError::Timeout(url.to_string())
    } else if err.is_connect() {
        EmbarkError::ConnectionRefused {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else {
        EmbarkError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl MetadataSource for EmbarkClient {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!(category = "fetch", url = %url, "Requesting composite metadata");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmbarkError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await.map_err(|e| EmbarkError::InvalidPayload {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!(category = "fetch", bytes = body.len(), "Composite metadata received");
        Ok(body)
    }
}
