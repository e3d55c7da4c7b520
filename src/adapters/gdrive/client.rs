//! Google Drive v3 REST client

use super::auth::TokenSource;
use super::models::{
    name_in_parent_query, CreateFileMetadata, FileIdResponse, FileList, FILE_LIST_FIELDS,
    PAGE_SIZE,
};
use crate::adapters::store::{DocumentStore, NewFileRequest, RemoteFile};
use crate::config::GoogleConfig;
use crate::domain::ids::FileId;
use crate::domain::{DriveError, KioskError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use std::path::Path;
use std::time::Duration;

/// Google Drive client scoped to shared drives
pub struct DriveClient {
    http: Client,
    base_url: String,
    tokens: TokenSource,
}

impl DriveClient {
    /// Create a client from the `[google]` section
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are incomplete or the HTTP client
    /// cannot be built
    pub fn new(config: &GoogleConfig) -> Result<Self> {
        let http = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| KioskError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens: TokenSource::from_credentials(&config.credentials)?,
        })
    }

    async fn bearer(&self) -> Result<String> {
        self.tokens.bearer(&self.http).await
    }

    async fn parse_file_id(response: Response) -> Result<FileId> {
        let body: FileIdResponse = response
            .json()
            .await
            .map_err(|e| DriveError::InvalidResponse(e.to_string()))?;
        Ok(FileId::new(body.id).map_err(DriveError::InvalidResponse)?)
    }
}

fn multipart_related_body(
    boundary: &str,
    metadata: &str,
    mime_type: &str,
    content: &[u8],
) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + metadata.len() + 256);
    body.extend_from_slice(
        format!("--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(metadata.as_bytes());
    body.extend_from_slice(format!("\r\n--{boundary}\r\nContent-Type: {mime_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[async_trait]
impl DocumentStore for DriveClient {
    async fn find_files(
        &self,
        drive_id: &str,
        parent_folder_id: &str,
        name: &str,
    ) -> Result<Vec<RemoteFile>> {
        let token = self.bearer().await?;
        let url = format!("{}/drive/v3/files", self.base_url);
        let query = name_in_parent_query(name, parent_folder_id);
        let page_size = PAGE_SIZE.to_string();

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("q", query.as_str()),
                ("pageSize", page_size.as_str()),
                ("fields", FILE_LIST_FIELDS),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
                ("corpora", "drive"),
                ("driveId", drive_id),
            ])
            .send()
            .await
            .map_err(|e| DriveError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DriveError::QueryFailed {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let list: FileList = response
            .json()
            .await
            .map_err(|e| DriveError::InvalidResponse(e.to_string()))?;

        if list.next_page_token.is_some() || list.incomplete_search {
            tracing::warn!(
                category = "upsert",
                file_name = %name,
                parent_folder_id = %parent_folder_id,
                "File lookup returned more than one page; only the first is used"
            );
        }

        list.files.into_iter().map(RemoteFile::try_from).collect()
    }

    async fn update_file(
        &self,
        file_id: &FileId,
        local_path: &Path,
        mime_type: &str,
    ) -> Result<FileId> {
        let content = tokio::fs::read(local_path).await?;
        let token = self.bearer().await?;
        let url = format!("{}/upload/drive/v3/files/{}", self.base_url, file_id);

        let response = self
            .http
            .patch(&url)
            .bearer_auth(token)
            .query(&[
                ("uploadType", "media"),
                ("supportsAllDrives", "true"),
                ("fields", "id"),
            ])
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(content)
            .send()
            .await
            .map_err(|e| DriveError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DriveError::UploadFailed {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Self::parse_file_id(response).await
    }

    async fn create_file(&self, request: &NewFileRequest, local_path: &Path) -> Result<FileId> {
        let content = tokio::fs::read(local_path).await?;
        let metadata = serde_json::to_string(&CreateFileMetadata {
            name: &request.name,
            mime_type: &request.mime_type,
            parents: vec![request.parent_folder_id.as_str()],
        })?;

        let boundary = format!("kiosk-{}", uuid::Uuid::new_v4().simple());
        let body = multipart_related_body(&boundary, &metadata, &request.mime_type, &content);

        let token = self.bearer().await?;
        let url = format!("{}/upload/drive/v3/files", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .query(&[
                ("uploadType", "multipart"),
                ("supportsAllDrives", "true"),
                ("fields", "id"),
            ])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| DriveError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DriveError::UploadFailed {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Self::parse_file_id(response).await
    }

    async fn delete_file(&self, file_id: &FileId) -> Result<()> {
        let token = self.bearer().await?;
        let url = format!("{}/drive/v3/files/{}", self.base_url, file_id);

        let response = self
            .http
            .delete(&url)
            .bearer_auth(token)
            .query(&[("supportsAllDrives", "true")])
            .send()
            .await
            .map_err(|e| DriveError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DriveError::DeleteFailed {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipart_related_body_layout() {
        let body = multipart_related_body("B", r#"{"name":"a.json"}"#, "application/json", b"{}");
        let text = String::from_utf8(body).unwrap();
        assert_eq!(
            text,
            "--B\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{\"name\":\"a.json\"}\
             \r\n--B\r\nContent-Type: application/json\r\n\r\n{}\r\n--B--\r\n"
        );
    }

    #[test]
    fn test_new_requires_credentials() {
        let config = GoogleConfig {
            enabled: true,
            ..Default::default()
        };
        assert!(DriveClient::new(&config).is_err());
    }
}
