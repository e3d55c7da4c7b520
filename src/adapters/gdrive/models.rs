//! Google Drive v3 wire models

use crate::adapters::store::RemoteFile;
use crate::domain::ids::FileId;
use crate::domain::{DriveError, Result};
use serde::{Deserialize, Serialize};

/// Fields requested from `files.list`
pub const FILE_LIST_FIELDS: &str =
    "kind, nextPageToken, incompleteSearch, files(id, name, mimeType, modifiedTime, parents)";

/// Maximum `files.list` page size; only the first page is read
pub const PAGE_SIZE: u32 = 1000;

/// `files.list` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    #[serde(default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub next_page_token: Option<String>,

    #[serde(default)]
    pub incomplete_search: bool,

    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// One entry of a `files.list` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(default)]
    pub modified_time: Option<String>,

    #[serde(default)]
    pub parents: Vec<String>,
}

impl TryFrom<DriveFile> for RemoteFile {
    type Error = crate::domain::KioskError;

    fn try_from(file: DriveFile) -> Result<Self> {
        let id = FileId::new(file.id).map_err(DriveError::InvalidResponse)?;
        Ok(RemoteFile {
            id,
            name: file.name,
            mime_type: file.mime_type,
            modified_time: file.modified_time,
            parents: file.parents,
        })
    }
}

/// Metadata part of a multipart create
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileMetadata<'a> {
    pub name: &'a str,
    pub mime_type: &'a str,
    pub parents: Vec<&'a str>,
}

/// Response of create/update with `fields=id`
#[derive(Debug, Clone, Deserialize)]
pub struct FileIdResponse {
    pub id: String,
}

/// OAuth token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Escape a value for use inside a single-quoted Drive query literal
pub fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// `q` parameter selecting non-trashed files by exact name under one parent
pub fn name_in_parent_query(name: &str, parent_folder_id: &str) -> String {
    format!(
        "name='{}' and '{}' in parents and trashed = false",
        escape_query_value(name),
        escape_query_value(parent_folder_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_in_parent_query() {
        assert_eq!(
            name_in_parent_query("1976.057.001.xml", "parent123"),
            "name='1976.057.001.xml' and 'parent123' in parents and trashed = false"
        );
    }

    #[test]
    fn test_escape_query_value() {
        assert_eq!(escape_query_value("O'Brien"), "O\\'Brien");
        assert_eq!(escape_query_value("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_file_list_deserialize() {
        let body = r#"{
            "kind": "drive#fileList",
            "incompleteSearch": false,
            "files": [
                {"id": "abc", "name": "obj1.json", "mimeType": "application/json",
                 "modifiedTime": "2024-03-01T10:00:00.000Z", "parents": ["parent"]}
            ]
        }"#;
        let list: FileList = serde_json::from_str(body).unwrap();
        assert_eq!(list.files.len(), 1);
        assert!(list.next_page_token.is_none());

        let remote = RemoteFile::try_from(list.files[0].clone()).unwrap();
        assert_eq!(remote.id.as_str(), "abc");
        assert_eq!(remote.parents, vec!["parent".to_string()]);
    }

    #[test]
    fn test_create_metadata_serializes_camel_case() {
        let metadata = CreateFileMetadata {
            name: "obj1.json",
            mime_type: "application/json",
            parents: vec!["parent"],
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["mimeType"], "application/json");
        assert_eq!(json["parents"][0], "parent");
        // driveId is output-only on create
        assert!(json.get("driveId").is_none());
    }
}
