//! Distribution sink traits
//!
//! The harvest pipeline only talks to remote systems through these traits,
//! which keeps the core testable with in-memory implementations.

use crate::domain::ids::FileId;
use crate::domain::Result;
use async_trait::async_trait;
use std::path::Path;

/// A file already present in the remote document store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Remote identifier
    pub id: FileId,

    /// File name
    pub name: String,

    /// MIME type reported by the store
    pub mime_type: Option<String>,

    /// Last modification timestamp (RFC 3339) reported by the store
    pub modified_time: Option<String>,

    /// Parent folder ids
    pub parents: Vec<String>,
}

/// Metadata for a file that doesn't exist yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFileRequest {
    /// File name, unique within the parent folder
    pub name: String,

    /// MIME type of the content
    pub mime_type: String,

    /// Parent folder id, which also fixes the shared drive
    pub parent_folder_id: String,
}

/// Remote document store (Google Drive)
///
/// Lookups return at most one page of results, in the order the store
/// returns them.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Find non-trashed files named exactly `name` directly under `parent_folder_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup request fails.
    async fn find_files(
        &self,
        drive_id: &str,
        parent_folder_id: &str,
        name: &str,
    ) -> Result<Vec<RemoteFile>>;

    /// Replace the content of an existing file with the bytes at `local_path`
    ///
    /// # Errors
    ///
    /// Returns an error if the local file can't be read or the upload fails.
    async fn update_file(
        &self,
        file_id: &FileId,
        local_path: &Path,
        mime_type: &str,
    ) -> Result<FileId>;

    /// Create a new file from the bytes at `local_path`
    ///
    /// # Errors
    ///
    /// Returns an error if the local file can't be read or the upload fails.
    async fn create_file(&self, request: &NewFileRequest, local_path: &Path) -> Result<FileId>;

    /// Delete a file
    ///
    /// # Errors
    ///
    /// Returns an error if the delete request fails.
    async fn delete_file(&self, file_id: &FileId) -> Result<()>;
}

/// Secondary object storage (S3)
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Copy a local file to `bucket`/`key`
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or the upload fails.
    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
        content_type: &str,
    ) -> Result<()>;
}

/// One outgoing email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// From address
    pub sender: String,

    /// To addresses
    pub recipients: Vec<String>,

    /// Subject line
    pub subject: String,

    /// HTML body
    pub html_body: String,

    /// Plain-text body; omitted from the message when empty
    pub text_body: String,
}

/// Email delivery
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message
    ///
    /// # Errors
    ///
    /// Returns an error if delivery is rejected or the service is unreachable.
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}
