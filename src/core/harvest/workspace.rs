//! Local working folder
//!
//! Holds the fetched composite documents and the per-object artifacts
//! between splitting and distribution.

use crate::config::WorkspaceConfig;
use crate::domain::{KioskError, ObjectId, RecordFormat, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// The local working folder of one run
#[derive(Debug, Clone)]
pub struct Workspace {
    folder: PathBuf,
    xml_path: PathBuf,
    json_path: PathBuf,
}

impl Workspace {
    pub fn new(config: &WorkspaceConfig) -> Self {
        Self {
            folder: config.folder_path().to_path_buf(),
            xml_path: config.xml_path(),
            json_path: config.json_path(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Create the folder if it doesn't exist yet
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.folder).map_err(|e| {
            KioskError::Io(format!(
                "Failed to create workspace {}: {e}",
                self.folder.display()
            ))
        })
    }

    /// Where the composite document of a format is stored
    pub fn composite_path(&self, format: RecordFormat) -> &Path {
        match format {
            RecordFormat::Xml => &self.xml_path,
            RecordFormat::Json => &self.json_path,
        }
    }

    /// Store a fetched composite document, replacing any previous one
    pub fn write_composite(&self, format: RecordFormat, contents: &[u8]) -> Result<PathBuf> {
        let path = self.composite_path(format).to_path_buf();
        self.write(&path, contents)?;
        tracing::debug!(
            format = %format,
            path = %path.display(),
            bytes = contents.len(),
            "Saved composite document"
        );
        Ok(path)
    }

    /// Store one object's artifact as `<id>.<extension>`
    pub fn write_artifact(
        &self,
        object_id: &ObjectId,
        format: RecordFormat,
        contents: &[u8],
    ) -> Result<PathBuf> {
        let path = self.folder.join(object_id.file_name(format.extension()));
        self.write(&path, contents)?;
        Ok(path)
    }

    /// Delete a file; a file that is already gone is not an error
    ///
    /// Returns whether a file was removed. Other failures are logged only.
    pub fn remove(&self, path: &Path) -> bool {
        match fs::remove_file(path) {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(
                    category = "local_io",
                    path = %path.display(),
                    error = %e,
                    "Failed to delete local file"
                );
                false
            }
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.ensure()?;
        fs::write(path, contents)
            .map_err(|e| KioskError::Io(format!("Failed to write {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace(dir: &TempDir) -> Workspace {
        Workspace::new(&WorkspaceConfig {
            folder: dir.path().join("work").to_string_lossy().into_owned(),
            ..Default::default()
        })
    }

    #[test]
    fn test_write_composite_creates_folder() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);

        let path = ws.write_composite(RecordFormat::Json, b"{}").unwrap();

        assert!(path.starts_with(ws.folder()));
        assert!(path.ends_with("web_kiosk_composite_metadata.json"));
        assert_eq!(fs::read(&path).unwrap(), b"{}");
    }

    #[test]
    fn test_write_artifact_named_after_object() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);
        let id = ObjectId::new("1976.057.001").unwrap();

        let path = ws.write_artifact(&id, RecordFormat::Xml, b"<a/>").unwrap();

        assert_eq!(path.file_name().unwrap(), "1976.057.001.xml");
    }

    #[test]
    fn test_remove_is_best_effort() {
        let dir = TempDir::new().unwrap();
        let ws = workspace(&dir);
        let id = ObjectId::new("obj1").unwrap();
        let path = ws.write_artifact(&id, RecordFormat::Json, b"{}").unwrap();

        assert!(ws.remove(&path));
        assert!(!path.exists());
        assert!(!ws.remove(&path));
    }
}
