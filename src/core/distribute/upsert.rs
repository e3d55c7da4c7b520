//! Create-or-update of per-object artifacts in the document store

use crate::adapters::store::{DocumentStore, NewFileRequest};
use crate::config::DriveFolderConfig;
use crate::domain::ids::FileId;
use crate::domain::{KioskError, Result};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// What the upsert did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Created,
    Updated,
}

impl fmt::Display for UpsertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpsertAction::Created => write!(f, "created"),
            UpsertAction::Updated => write!(f, "updated"),
        }
    }
}

/// Result of one upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub file_id: FileId,
    pub action: UpsertAction,
}

/// Keeps exactly one remote file per (parent folder, file name)
///
/// Lookup, then update the first match or create. Calls must not overlap
/// for the same key; the harvest pipeline runs them strictly in sequence.
pub struct RemoteFileUpserter {
    store: Arc<dyn DocumentStore + Send + Sync>,
    drive_id: String,
    parent_folder_id: String,
}

impl RemoteFileUpserter {
    pub fn new(store: Arc<dyn DocumentStore + Send + Sync>, folder: &DriveFolderConfig) -> Self {
        Self {
            store,
            drive_id: folder.drive_id.clone(),
            parent_folder_id: folder.parent_folder_id.clone(),
        }
    }

    /// Upload `local_path` under its file name
    ///
    /// # Errors
    ///
    /// Lookup and upload failures propagate unchanged; nothing is retried.
    pub async fn upsert(&self, local_path: &Path, mime_type: &str) -> Result<UpsertOutcome> {
        let file_name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                KioskError::Validation(format!("No file name in {}", local_path.display()))
            })?;

        let existing = self
            .store
            .find_files(&self.drive_id, &self.parent_folder_id, file_name)
            .await?;

        if existing.len() > 1 {
            tracing::warn!(
                category = "upsert",
                file_name = %file_name,
                matches = existing.len(),
                chosen = %existing[0].id,
                "Duplicate remote files; updating the first returned"
            );
        }

        let outcome = match existing.into_iter().next() {
            Some(remote) => {
                let file_id = self
                    .store
                    .update_file(&remote.id, local_path, mime_type)
                    .await?;
                UpsertOutcome {
                    file_id,
                    action: UpsertAction::Updated,
                }
            }
            None => {
                let request = NewFileRequest {
                    name: file_name.to_string(),
                    mime_type: mime_type.to_string(),
                    parent_folder_id: self.parent_folder_id.clone(),
                };
                let file_id = self.store.create_file(&request, local_path).await?;
                UpsertOutcome {
                    file_id,
                    action: UpsertAction::Created,
                }
            }
        };

        tracing::info!(
            category = "upsert",
            file_name = %file_name,
            file_id = %outcome.file_id,
            action = %outcome.action,
            "Remote file saved"
        );
        Ok(outcome)
    }
}
