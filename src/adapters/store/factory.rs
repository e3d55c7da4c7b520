//! Sink factory
//!
//! Builds the distribution sinks enabled in the configuration. A disabled
//! sink is returned as `None` and the pipeline skips that step.

use crate::adapters::gdrive::DriveClient;
use crate::adapters::s3::S3ObjectStorage;
use crate::adapters::ses::SesMailer;
use crate::adapters::store::traits::{DocumentStore, Mailer, ObjectStorage};
use crate::config::KioskConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the Google Drive client if `[google]` is enabled
///
/// # Errors
///
/// Returns an error if the client cannot be built from the credentials
pub fn create_document_store(
    config: &KioskConfig,
) -> Result<Option<Arc<dyn DocumentStore + Send + Sync>>> {
    if !config.google.enabled {
        tracing::info!("Google Drive distribution disabled");
        return Ok(None);
    }

    tracing::info!(api_base_url = %config.google.api_base_url, "Creating Google Drive client");
    let client = DriveClient::new(&config.google)?;
    Ok(Some(Arc::new(client) as Arc<dyn DocumentStore + Send + Sync>))
}

/// Create the S3 client if `[s3]` is enabled
pub async fn create_object_storage(
    config: &KioskConfig,
) -> Option<Arc<dyn ObjectStorage + Send + Sync>> {
    if !config.s3.enabled {
        tracing::info!("S3 copy disabled");
        return None;
    }

    tracing::info!(bucket = %config.s3.bucket, "Creating S3 client");
    let storage = S3ObjectStorage::from_env(config.s3.region.clone()).await;
    Some(Arc::new(storage) as Arc<dyn ObjectStorage + Send + Sync>)
}

/// Create the SES mailer if `[notification]` is enabled
pub async fn create_mailer(config: &KioskConfig) -> Option<Arc<dyn Mailer + Send + Sync>> {
    if !config.notification.enabled {
        tracing::info!("Missing-field notification disabled");
        return None;
    }

    let mailer = SesMailer::from_env(config.notification.region.clone()).await;
    Some(Arc::new(mailer) as Arc<dyn Mailer + Send + Sync>)
}
