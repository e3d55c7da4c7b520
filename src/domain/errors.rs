//! Domain error types
//!
//! This module defines the error hierarchy for Kiosk Export. Errors are
//! domain-specific and don't expose third-party types: HTTP, SDK and XML
//! parser failures are converted to strings at the adapter boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Main Kiosk Export error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum KioskError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Errors fetching the composite document from Embark
    #[error("Embark error: {0}")]
    Embark(#[from] EmbarkError),

    /// Google Drive errors
    #[error("Google Drive error: {0}")]
    Drive(#[from] DriveError),

    /// Secondary object storage (S3) errors
    #[error("Object storage error: {0}")]
    ObjectStorage(String),

    /// Notification delivery errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// The composite file the splitter should read is absent
    #[error("Source file not found: {}", .0.display())]
    SourceFileMissing(PathBuf),

    /// Malformed XML or XML serialization failures
    #[error("XML error: {0}")]
    Xml(String),

    /// Validation errors (bad paths, missing identifiers)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while retrieving metadata from the Embark server
///
/// Kept distinct so that "the server had nothing for us" and "the fetch
/// failed" stay distinguishable in the logs even though both end the phase.
#[derive(Debug, Error)]
pub enum EmbarkError {
    /// The server refused the connection
    #[error("Connection refused on url {url}: {message}")]
    ConnectionRefused { url: String, message: String },

    /// Non-success HTTP status
    #[error("Unable to retrieve metadata from {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Request timed out
    #[error("Request to {0} timed out")]
    Timeout(String),

    /// Any other transport failure
    #[error("Error caught trying to process url {url}: {message}")]
    Transport { url: String, message: String },

    /// The body could not be decoded or parsed
    #[error("Invalid payload from {url}: {message}")]
    InvalidPayload { url: String, message: String },
}

/// Google Drive specific errors
#[derive(Debug, Error)]
pub enum DriveError {
    /// Token exchange or assertion signing failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Failed to reach the Drive API
    #[error("Failed to connect to Google Drive: {0}")]
    ConnectionFailed(String),

    /// File lookup failed
    #[error("File query failed: {status} - {message}")]
    QueryFailed { status: u16, message: String },

    /// Create or update failed
    #[error("Upload failed: {status} - {message}")]
    UploadFailed { status: u16, message: String },

    /// Delete failed
    #[error("Delete failed: {status} - {message}")]
    DeleteFailed { status: u16, message: String },

    /// Unexpected response body
    #[error("Invalid response from Google Drive: {0}")]
    InvalidResponse(String),
}

impl From<std::io::Error> for KioskError {
    fn from(err: std::io::Error) -> Self {
        KioskError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for KioskError {
    fn from(err: serde_json::Error) -> Self {
        KioskError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for KioskError {
    fn from(err: toml::de::Error) -> Self {
        KioskError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<quick_xml::Error> for KioskError {
    fn from(err: quick_xml::Error) -> Self {
        KioskError::Xml(err.to_string())
    }
}
